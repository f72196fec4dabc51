// File: crates/chart-core/build.rs
// Summary: Links the Windows registry API that Skia's textlayout/ICU font lookup depends on.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // RegOpenKeyExW / RegQueryInfoKeyW come from the system font manager.
        println!("cargo:rustc-link-lib=advapi32");
    }
}
