fn main() {
    if let Err(e) = localchat::cli::main() {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}
