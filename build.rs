fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // ESP-IDF environment is only needed for the on-target firmware build.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
