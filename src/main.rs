fn main() {
    if let Err(e) = titanic_lab::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
