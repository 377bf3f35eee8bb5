fn main() {
    if let Err(e) = simple_logger::init_with_level(log::Level::Info) {
        eprintln!("Logger setup failed: {}", e);
    }

    if let Err(e) = ottofm::runtime::start() {
        log::error!("ottofm stopped: {}", e);
        std::process::exit(1);
    }
}
