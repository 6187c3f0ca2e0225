// Web Interface module root
pub mod routes;
pub mod static_assets;
pub mod types;
pub mod web_server;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use routes::routes;
pub use web_server::WebServer;
