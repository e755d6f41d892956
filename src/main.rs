use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = q::logging::init();

    match q::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            q::report(&err);
            ExitCode::FAILURE
        }
    }
}
