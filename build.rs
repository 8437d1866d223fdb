fn main() {
    // ESP-IDF toolchain environment is only needed when building for the board.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
