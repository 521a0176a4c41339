fn main() {
    std::process::exit(duoweb_cli::run());
}
