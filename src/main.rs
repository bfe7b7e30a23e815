fn main() {
    if let Err(err) = csv_profiler::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
