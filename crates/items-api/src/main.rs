use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use tokio::net::TcpListener;

use items_api::db::Db;

#[tokio::main]
async fn main() -> Result<()> {
    let bind = std::env::var("ITEMS_API_BIND").unwrap_or_else(|_| "127.0.0.1".into());
    let port: u16 = std::env::var("ITEMS_API_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3800);
    let db_path = std::env::var("ITEMS_API_DB").unwrap_or_else(|_| "items.db".into());

    let db = Db::open(Path::new(&db_path))?;
    let addr = SocketAddr::new(bind.parse()?, port);
    let listener = TcpListener::bind(addr).await?;
    eprintln!("items-api listening on http://{addr}");

    items_api::serve(listener, db).await?;
    Ok(())
}
