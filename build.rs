//! build.rs — download build-time assets once.
//!
//! Assets downloaded:
//!   1. Natural Earth country GeoJSON       → assets/world.geojson   (map rendering)
//!   2. MaxMind GeoLite2-City database      → assets/GeoLite2-City.mmdb (current position)
//!
//! For the MaxMind database a free licence key is required:
//!   • Sign up at https://www.maxmind.com/en/geolite2/signup
//!   • Export MAXMIND_LICENSE_KEY=<your_key> then run `cargo build`
//!   • Once assets/GeoLite2-City.mmdb exists the key is no longer needed.
//!
//! Both downloads are optional: a failure is reported and the build goes on.
//! Set GEOCENTER_OFFLINE=1 to skip the network entirely.

use std::{env, fs, io::Read, path::Path};

const GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/datasets/geo-countries/master/data/countries.geojson";
const GEOJSON_PATH: &str = "assets/world.geojson";
const MMDB_PATH:    &str = "assets/GeoLite2-City.mmdb";
const MMDB_URL_TMPL: &str =
    "https://download.maxmind.com/app/geoip_download\
     ?edition_id=GeoLite2-City&license_key={KEY}&suffix=tar.gz";

fn main() {
    println!("cargo:rerun-if-env-changed=MAXMIND_LICENSE_KEY");
    println!("cargo:rerun-if-env-changed=GEOCENTER_OFFLINE");
    println!("cargo:rerun-if-changed={GEOJSON_PATH}");
    println!("cargo:rerun-if-changed={MMDB_PATH}");

    if env::var_os("GEOCENTER_OFFLINE").is_some() {
        eprintln!("[build] GEOCENTER_OFFLINE set, not downloading assets.");
        return;
    }

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let assets = Path::new(&manifest_dir).join("assets");
    if let Err(e) = fs::create_dir_all(&assets) {
        eprintln!("[build] could not create assets/ directory: {e}");
        return;
    }

    // ── 1. GeoJSON ────────────────────────────────────────────────────────
    let geojson_dest = assets.join("world.geojson");
    if geojson_dest.exists() {
        eprintln!("[build] world.geojson already present, skipping.");
    } else {
        eprintln!("[build] Downloading world.geojson ...");
        match fetch(GEOJSON_URL) {
            Ok(body) => match fs::write(&geojson_dest, &body) {
                Ok(()) => eprintln!("[build] Saved {} bytes → {GEOJSON_PATH}", body.len()),
                Err(e) => eprintln!("[build] ✗ Failed to write world.geojson: {e}"),
            },
            Err(e) => eprintln!("[build] ✗ Failed to download world.geojson: {e} (fetched at runtime instead)"),
        }
    }

    // ── 2. GeoLite2-City.mmdb ─────────────────────────────────────────────
    let mmdb_dest = assets.join("GeoLite2-City.mmdb");
    if mmdb_dest.exists() {
        eprintln!("[build] GeoLite2-City.mmdb already present, skipping.");
        return;
    }

    let key = match env::var("MAXMIND_LICENSE_KEY") {
        Ok(k) if !k.is_empty() => k,
        _ => {
            eprintln!("[build] ⚠  MAXMIND_LICENSE_KEY is not set.");
            eprintln!("[build]    GeoIP positioning disabled; pass --position LAT,LNG instead.");
            eprintln!("[build]    Free sign-up: https://www.maxmind.com/en/geolite2/signup");
            return;
        }
    };

    eprintln!("[build] Downloading GeoLite2-City.tar.gz (this may take a moment) ...");
    let tar_gz = match fetch(&MMDB_URL_TMPL.replace("{KEY}", &key)) {
        Ok(buf) => buf,
        Err(e) => {
            eprintln!("[build] ✗ Failed to download GeoLite2-City: {e}");
            eprintln!("[build]   Check that your MAXMIND_LICENSE_KEY is valid.");
            return;
        }
    };

    eprintln!("[build] Downloaded {} bytes, extracting .mmdb ...", tar_gz.len());
    match extract_mmdb(&tar_gz) {
        Ok(Some(buf)) => match fs::write(&mmdb_dest, &buf) {
            Ok(()) => eprintln!("[build] ✓ Saved {} bytes → {MMDB_PATH}", buf.len()),
            Err(e) => eprintln!("[build] ✗ Failed to write GeoLite2-City.mmdb: {e}"),
        },
        Ok(None) => eprintln!("[build] ✗ No .mmdb file found inside the archive — check the download URL format."),
        Err(e) => eprintln!("[build] ✗ Corrupt archive: {e}"),
    }
}

fn extract_mmdb(tar_gz: &[u8]) -> std::io::Result<Option<Vec<u8>>> {
    let gz = flate2::read::GzDecoder::new(tar_gz);
    let mut archive = tar::Archive::new(gz);
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        if path.extension().map_or(false, |e| e == "mmdb") {
            let mut buf = Vec::new();
            entry.read_to_end(&mut buf)?;
            return Ok(Some(buf));
        }
    }
    Ok(None)
}

fn fetch(url: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let resp = ureq::get(url).set("Accept-Encoding", "identity").call()?;
    let mut buf = Vec::new();
    resp.into_reader().read_to_end(&mut buf)?;
    Ok(buf)
}
