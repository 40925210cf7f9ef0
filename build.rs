fn main() {
    // Build-time configuration override, see `PaddleConfig::from_build_env`.
    println!("cargo:rerun-if-env-changed=MORSEFORGE_CONFIG_JSON");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
