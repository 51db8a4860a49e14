fn main() {
    #[cfg(feature = "cli")]
    z85::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("z85: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
