use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::log;
use crate::paths::get_tesseract_dir;

const TESSDATA_REPO: &str = "https://github.com/tesseract-ocr/tessdata/raw/main";

/// Trained data used for orientation and script detection.
const OSD_LANGUAGE: &str = "osd";

#[cfg(windows)]
const TESSERACT_EXE: &str = "tesseract.exe";
#[cfg(not(windows))]
const TESSERACT_EXE: &str = "tesseract";

#[cfg(windows)]
const COMMON_INSTALL_DIRS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR",
    r"C:\Program Files (x86)\Tesseract-OCR",
];
#[cfg(not(windows))]
const COMMON_INSTALL_DIRS: &[&str] = &["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"];

#[cfg(windows)]
const SYSTEM_TESSDATA_DIRS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR\tessdata",
    r"C:\Program Files (x86)\Tesseract-OCR\tessdata",
];
#[cfg(not(windows))]
const SYSTEM_TESSDATA_DIRS: &[&str] = &[
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    "/opt/homebrew/share/tessdata",
];

pub struct TesseractPaths {
    pub executable: PathBuf,
    pub tessdata: PathBuf,
}

/// Splits a Tesseract language string such as "eng+kor" into its parts.
pub fn language_codes(language: &str) -> Vec<&str> {
    language
        .split('+')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect()
}

/// Returns true if `dir` holds a `.traineddata` file for every code.
fn has_traineddata(dir: &Path, codes: &[&str]) -> bool {
    codes
        .iter()
        .all(|code| dir.join(format!("{}.traineddata", code)).exists())
}

/// Ensures Tesseract and the trained data for `language` are available.
/// Missing trained data is downloaded into the local tessdata directory.
pub fn ensure_tesseract(language: &str, auto_orientation: bool) -> Result<TesseractPaths> {
    let executable = find_tesseract_executable()?;
    log(&format!("Tesseract executable: {}", executable.display()));

    let mut codes = language_codes(language);
    if codes.is_empty() {
        return Err(anyhow!("No OCR language configured"));
    }
    if auto_orientation && !codes.contains(&OSD_LANGUAGE) {
        codes.push(OSD_LANGUAGE);
    }

    if let Ok(tessdata) = find_tessdata_dir(&codes.join("+")) {
        log(&format!("Tesseract data found at: {}", tessdata.display()));
        return Ok(TesseractPaths {
            executable,
            tessdata,
        });
    }

    let tessdata_dir = get_tesseract_dir().join("tessdata");
    fs::create_dir_all(&tessdata_dir)?;

    for code in codes {
        let target = tessdata_dir.join(format!("{}.traineddata", code));
        if target.exists() {
            continue;
        }
        if let Some(system_copy) = find_system_traineddata(code) {
            log(&format!("Copying {}.traineddata from: {}", code, system_copy.display()));
            fs::copy(&system_copy, &target)?;
        } else {
            download_traineddata(code, &target)?;
        }
    }

    log(&format!("Tesseract data ready at: {}", tessdata_dir.display()));

    Ok(TesseractPaths {
        executable,
        tessdata: tessdata_dir,
    })
}

fn find_system_traineddata(code: &str) -> Option<PathBuf> {
    SYSTEM_TESSDATA_DIRS
        .iter()
        .map(|dir| PathBuf::from(dir).join(format!("{}.traineddata", code)))
        .find(|path| path.exists())
}

/// Downloads one trained data file from the tessdata repository.
fn download_traineddata(code: &str, target: &Path) -> Result<()> {
    let url = format!("{}/{}.traineddata", TESSDATA_REPO, code);
    log(&format!("Downloading {}.traineddata...", code));

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let response = client
        .get(&url)
        .header("User-Agent", "rivals-lobby-tracker")
        .send()
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to download {}.traineddata: HTTP {}",
            code,
            response.status()
        ));
    }

    let bytes = response.bytes()?;
    let mut file = fs::File::create(target)?;
    file.write_all(&bytes)?;

    log(&format!(
        "Downloaded {}.traineddata ({} bytes)",
        code,
        bytes.len()
    ));

    Ok(())
}

/// Finds the Tesseract executable, checking our local dir first, then PATH, then common installs
pub fn find_tesseract_executable() -> Result<PathBuf> {
    let local_exe = get_tesseract_dir().join(TESSERACT_EXE);
    if local_exe.exists() {
        return Ok(local_exe);
    }

    if let Ok(output) = std::process::Command::new("tesseract")
        .arg("--version")
        .output()
    {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    for dir in COMMON_INSTALL_DIRS {
        let p = PathBuf::from(dir).join(TESSERACT_EXE);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(anyhow!(
        "Tesseract not found. Install Tesseract-OCR and add it to PATH, or copy it to: {}",
        get_tesseract_dir().display()
    ))
}

/// Finds a tessdata directory containing every language in `language` (e.g. "eng+kor").
pub fn find_tessdata_dir(language: &str) -> Result<PathBuf> {
    let codes = language_codes(language);

    let mut candidates = vec![get_tesseract_dir().join("tessdata")];
    candidates.extend(SYSTEM_TESSDATA_DIRS.iter().map(PathBuf::from));

    // TESSDATA_PREFIX may point at the tessdata dir itself or at its parent
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let prefix = PathBuf::from(prefix);
        candidates.push(prefix.join("tessdata"));
        candidates.push(prefix);
    }

    candidates
        .into_iter()
        .find(|dir| has_traineddata(dir, &codes))
        .ok_or_else(|| {
            anyhow!(
                "tessdata directory not found. Please ensure {}.traineddata is available.",
                codes.join(".traineddata, ")
            )
        })
}
