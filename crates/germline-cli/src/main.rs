//! Binary entrypoint for the germline runner.

#[tokio::main]
async fn main() {
    let exit_code = germline_cli::run().await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
