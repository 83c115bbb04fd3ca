fn main() {
    if let Err(err) = langstat_treemap::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
