use super::*;
use crate::export::manifest::build_manifest;
use crate::foundation::core::Size;
use crate::project::dsl::{ProjectBuilder, scene};
use crate::project::store::SceneStore;

fn manifest() -> ExportManifest {
    let project = ProjectBuilder::new(10.0)
        .scene(scene("a", "a.png"))
        .unwrap()
        .build()
        .unwrap();
    build_manifest(&SceneStore::new(project).unwrap(), Size::new(64.0, 64.0))
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_export").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn in_memory_sink_records_manifests() {
    let mut sink = InMemoryExportSink::new();
    sink.export(&manifest()).unwrap();
    sink.export(&manifest()).unwrap();
    assert_eq!(sink.manifests().len(), 2);
}

#[test]
fn json_sink_writes_and_respects_overwrite() {
    let dir = scratch_dir("json_sink");
    let out_path = dir.join("nested").join("manifest.json");

    let mut sink = JsonFileSink::new(JsonFileSinkOpts {
        out_path: out_path.clone(),
        overwrite: false,
    });
    sink.export(&manifest()).unwrap();
    let text = std::fs::read_to_string(&out_path).unwrap();
    let back: ExportManifest = serde_json::from_str(&text).unwrap();
    assert_eq!(back, manifest());

    let err = sink.export(&manifest()).unwrap_err();
    assert!(matches!(err, ScenecutError::Export(_)));

    let mut overwriting = JsonFileSink::new(JsonFileSinkOpts {
        out_path,
        overwrite: true,
    });
    overwriting.export(&manifest()).unwrap();
}

#[test]
fn ensure_parent_dir_accepts_bare_file_names() {
    ensure_parent_dir(Path::new("manifest.json")).unwrap();
}
