fn main() {
    if let Err(err) = netusage::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
