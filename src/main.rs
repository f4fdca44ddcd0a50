fn main() {
    if let Err(err) = bibliometa::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
