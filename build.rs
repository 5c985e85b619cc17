use std::env;
use std::fs;
use std::io;
use std::path::Path;

/// Copies `ui/` into `$OUT_DIR/ui` for `rust-embed`. HTML files are minified
/// in release builds.
fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=ui/");

    let out_dir = env::var("OUT_DIR").map_err(io::Error::other)?;
    let dest_path = Path::new(&out_dir).join("ui");
    let src_path = Path::new("ui");

    if dest_path.exists() {
        fs::remove_dir_all(&dest_path)?;
    }
    fs::create_dir_all(&dest_path)?;

    let should_minify = env::var("PROFILE").is_ok_and(|p| p == "release");
    if !src_path.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(src_path)? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().filter(|_| path.is_file()) else {
            continue;
        };
        let dest_file = dest_path.join(file_name);
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        if should_minify && ext == "html" {
            let mut cfg = minify_html::Cfg::new();
            cfg.minify_css = true;
            cfg.minify_js = true;
            cfg.keep_comments = false;
            fs::write(&dest_file, minify_html::minify(&fs::read(&path)?, &cfg))?;
        } else {
            fs::copy(&path, &dest_file)?;
        }
    }
    Ok(())
}
