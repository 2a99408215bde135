pub mod db;
mod routes;

use anyhow::Result;
use tokio::net::TcpListener;

use db::Db;

pub async fn serve(listener: TcpListener, db: Db) -> Result<()> {
    let app = routes::build_router(db);
    axum::serve(listener, app).await?;
    Ok(())
}
