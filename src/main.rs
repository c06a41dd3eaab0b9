use greeter::{adapter, app, logging, server, Config, Error, ServeMode};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    logging::init_logging(config.mode);

    // build our application with a single route
    let app = app::router();

    match config.mode {
        ServeMode::Lambda => {
            let options = adapter::Options::default().base_path(config.base_path);
            adapter::run_with(app, options).await
        }
        ServeMode::Http => server::serve(app, config.addr).await,
    }
}
