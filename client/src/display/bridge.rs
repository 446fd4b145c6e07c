use crate::display::model::ListingModel;
use crate::workflow::runner::Runner;
use anyhow::{anyhow, Context};
use log::{error, info};
use quakecore::QuakeList;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{mpsc, Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::Filter;

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// A bound display bridge serving on a background thread.
pub struct RunningBridge {
    pub addr: SocketAddr,
    pub thread: thread::JoinHandle<()>,
}

/// Owns the displayed list and publishes it over HTTP for an external viewer.
pub struct DisplayBridge {
    state: Arc<RwLock<QuakeList>>,
    runner: Arc<Runner>,
}

impl DisplayBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(QuakeList::new())),
            runner,
        }
    }

    pub fn state(&self) -> Arc<RwLock<QuakeList>> {
        self.state.clone()
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state = self.state.clone();
        let runner = self.runner.clone();
        let state_filter = warp::any().map(move || state.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let records_route = warp::path("records")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<QuakeList>>| warp::reply::json(&listing_of(&state)));

        let refresh_route = warp::path("refresh")
            .and(warp::path::end())
            .and(warp::post())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |state: Arc<RwLock<QuakeList>>, runner: Arc<Runner>| async move {
                    let result = runner.refresh(&state).await;
                    Ok::<_, warp::Rejection>(warp::reply::json(&json!({
                        "status": "ok",
                        "records": result.record_count,
                        "complete": result.complete,
                    })))
                },
            );

        records_route.or(refresh_route)
    }

    /// Binds `addr` and serves the routes on their own thread and runtime.
    ///
    /// Returns once the socket is bound, or with the bind error.
    pub fn serve(&self, addr: SocketAddr) -> anyhow::Result<RunningBridge> {
        let routes = self.routes();
        let (bound_tx, bound_rx) = mpsc::channel::<anyhow::Result<SocketAddr>>();

        let thread = thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = bound_tx.send(Err(
                        anyhow::Error::new(err).context("creating runtime for the display bridge")
                    ));
                    return;
                }
            };
            let bound = {
                let _context = runtime.enter();
                warp::serve(routes).try_bind_ephemeral(addr)
            };
            match bound {
                Ok((local_addr, server)) => {
                    let _ = bound_tx.send(Ok(local_addr));
                    runtime.block_on(server);
                }
                Err(err) => {
                    error!("display bridge failed to bind {}: {}", addr, err);
                    let _ = bound_tx.send(Err(anyhow!("binding {}: {}", addr, err)));
                }
            }
        });

        let local_addr = bound_rx
            .recv()
            .context("display bridge thread exited before binding")??;
        info!("display bridge listening on {}", local_addr);
        Ok(RunningBridge {
            addr: local_addr,
            thread,
        })
    }

    pub fn snapshot(&self) -> ListingModel {
        listing_of(&self.state)
    }

    pub fn publish_status(&self, message: &str) {
        println!("[display] {}", message);
    }
}

fn listing_of(state: &RwLock<QuakeList>) -> ListingModel {
    match state.read() {
        Ok(guard) => ListingModel::from_list(&guard),
        Err(poisoned) => ListingModel::from_list(&poisoned.into_inner()),
    }
}
