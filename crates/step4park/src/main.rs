use step4park::{Settings, log_version_info, run, setup_logging};

fn main() {
    setup_logging();
    log_version_info();

    let settings = Settings::from_cli();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();

    if let Err(e) = rt.block_on(run(settings)) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
