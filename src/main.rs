fn main() {
    if let Err(err) = runway::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
