use std::net::SocketAddr;
use std::sync::Arc;

use log::info;
use warp::Filter;

use super::routes;
use crate::storage::storage_trait::ActivityStore;

/// Web server for the JSON API and the static front-end
pub struct WebServer {
    store: Arc<dyn ActivityStore>,
}

impl WebServer {
    /// Create a new WebServer instance backed by `store`
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// Serve requests on `addr` until the process exits
    pub async fn start(&self, addr: SocketAddr) {
        let routes = routes::routes(self.store.clone()).with(warp::log("mergington::web"));

        info!("Serving activities on http://{}", addr);
        warp::serve(routes).run(addr).await;
    }
}
