fn main() {
    if let Err(e) = tableview::app::run_cli() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
