use std::fs;
use std::path::{Path, PathBuf};

const UPDATE_VAR: &str = "CHIMBREAK_UPDATE_SNAPSHOTS";

/// Output file kinds kept under `tests/snapshots/`.
#[derive(Debug, Clone, Copy)]
pub enum Snapshot {
    /// Break report, `breaks/<name>.tsv`.
    Breaks,
    /// Remapped annotation, `gff/<name>.gff`.
    Gff,
}

impl Snapshot {
    fn path(self, name: &str) -> PathBuf {
        let (dir, ext) = match self {
            Snapshot::Breaks => ("breaks", "tsv"),
            Snapshot::Gff => ("gff", "gff"),
        };
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("snapshots")
            .join(dir)
            .join(format!("{name}.{ext}"))
    }
}

pub fn assert_snapshot(kind: Snapshot, name: &str, actual: &str) {
    let path = kind.path(name);
    if std::env::var_os(UPDATE_VAR).is_some() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("snapshot {} not found; set {UPDATE_VAR}=1", path.display()));
    let expected = expected.replace("\r\n", "\n");
    if expected == actual {
        return;
    }

    let mismatch = expected
        .lines()
        .zip(actual.lines())
        .position(|(e, a)| e != a)
        .unwrap_or_else(|| expected.lines().count().min(actual.lines().count()));
    panic!(
        "snapshot {} differs from line {}. Set {UPDATE_VAR}=1 to regenerate.\nExpected:\n{expected}\nActual:\n{actual}",
        path.display(),
        mismatch + 1
    );
}
