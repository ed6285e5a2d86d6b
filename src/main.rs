fn main() {
    if let Err(err) = request_export::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
