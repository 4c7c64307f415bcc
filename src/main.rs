fn main() {
    if let Err(e) = pygmy_resolv::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
