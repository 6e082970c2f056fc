use log::*;

use pollbits::config::Config;
use pollbits::dao::Database;
use pollbits::{routes, AppState};

#[async_std::main]
async fn main() -> Result<(), std::io::Error> {
    pretty_env_logger::init();

    let config = Config::from_env();

    let db = match Database::connect(&config).await {
        Ok(db) => db,
        Err(err) => {
            error!("Could not initialize pool! {:?}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, err));
        }
    };

    if let Err(err) = db.migrate().await {
        error!("Could not migrate the database! {:?}", err);
        return Err(std::io::Error::new(std::io::ErrorKind::Other, err));
    }

    let app = routes::app(AppState { db });
    info!("Listening on {}", config.listen);
    app.listen(config.listen).await?;
    Ok(())
}
