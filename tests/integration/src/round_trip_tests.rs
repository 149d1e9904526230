//! Export/import round trips through the package host
//!
//! These run the synchronization engine against real package documents on
//! disk, so the codec, the host and the engine are exercised together.

use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use vba_core::{
    CodeComponentHandle, CodeProjectHandle, ComponentKind, DocumentHandle, DocumentKind, Exporter,
    Importer, LineRange, SyncSettings,
};
use vba_fs::NormalizedPath;
use vba_package::{DocumentFile, OpenMode, PackageDocument, PackageHost};
use vba_test_utils::TestFolder;

const DRAWING: &str = r#"
kind = "drawing"
docked = ["stencils/Shapes.vss.json"]

[[project.components]]
name = "ThisDocument"
kind = "document"
code = "Private Sub Document_Opened(ByVal doc As IVDocument)\n    Init\nEnd Sub"

[[project.components]]
name = "Module1"
kind = "standard"
code = "Option Explicit\nSub Init()\nEnd Sub"

[[project.components]]
name = "Counter"
kind = "class"
code = "Private m As Long\nPublic Sub Increment()\n    m = m + 1\nEnd Sub"

[[project.components]]
name = "Settings"
kind = "form"
code = "Private Sub UserForm_Initialize()\nEnd Sub"
"#;

const STENCIL: &str = r#"{
  "kind": "stencil",
  "project": {
    "components": [
      { "name": "ThisDocument", "kind": "document" },
      { "name": "ShapeHelpers", "kind": "standard", "code": "Sub Place()\nEnd Sub" }
    ]
  }
}"#;

fn package() -> TestFolder {
    let folder = TestFolder::new();
    folder
        .write("Drawing1.vsd.toml", DRAWING)
        .write("stencils/Shapes.vss.json", STENCIL);
    folder
}

/// Component name -> (kind, code) for every component of `document`.
fn snapshot(document: &PackageDocument) -> BTreeMap<String, (ComponentKind, String)> {
    let project = document.code_project().unwrap().unwrap();
    project
        .components()
        .unwrap()
        .into_iter()
        .map(|c| {
            let count = c.line_count().unwrap();
            let code = c.lines(LineRange::all(count)).unwrap();
            (c.name(), (c.kind(), code))
        })
        .collect()
}

fn open(host: &PackageHost, path: NormalizedPath, mode: OpenMode) -> PackageDocument {
    host.open(&path, mode).unwrap()
}

#[test]
fn test_round_trip_into_blank_document() {
    let folder = package();
    let host = PackageHost::new();
    let source = open(
        &host,
        folder.normalized().join("Drawing1.vsd.toml"),
        OpenMode::READ_ONLY,
    );
    let expected = snapshot(&source);

    Exporter::new()
        .run(source, &folder.normalized().join("vba"), &SyncSettings::default())
        .unwrap();

    let blank = host
        .create(
            &folder.normalized().join("Blank.vsd.yaml"),
            &DocumentFile::new(DocumentKind::Drawing),
        )
        .unwrap();
    Importer::new()
        .run(blank.clone(), &folder.normalized().join("vba"), &SyncSettings::default())
        .unwrap();

    assert_eq!(snapshot(&blank), expected);
}

#[test]
fn test_reimport_of_own_export_is_idempotent() {
    let folder = package();
    let host = PackageHost::new();
    let document = open(
        &host,
        folder.normalized().join("Drawing1.vsd.toml"),
        OpenMode::READ_WRITE,
    );
    let before = snapshot(&document);
    let target = folder.normalized().join("vba");
    let settings = SyncSettings {
        clear_before_import: true,
        ..SyncSettings::default()
    };

    Exporter::new().run(document.clone(), &target, &settings).unwrap();
    let first = folder.read("vba/Counter.cls");
    Importer::new().run(document.clone(), &target, &settings).unwrap();
    Exporter::new().run(document.clone(), &target, &settings).unwrap();

    assert_eq!(snapshot(&document), before);
    assert_eq!(folder.read("vba/Counter.cls"), first);
}

#[test]
fn test_stencils_round_trip_and_are_saved() {
    let folder = package();
    let target = folder.normalized().join("vba");
    let settings = SyncSettings {
        include_stencils: true,
        ..SyncSettings::default()
    };

    let host = PackageHost::new();
    let drawing = open(
        &host,
        folder.normalized().join("Drawing1.vsd.toml"),
        OpenMode::READ_WRITE,
    );
    Exporter::new().run(drawing.clone(), &target, &settings).unwrap();
    folder.assert_exists("vba/Shapes.vss/ShapeHelpers.bas");

    folder.write(
        "vba/Shapes.vss/ShapeHelpers.bas",
        "Attribute VB_Name = \"ShapeHelpers\"\r\nSub Place()\r\n    ' moved\r\nEnd Sub\r\n",
    );
    let report = Importer::new().run(drawing, &target, &settings).unwrap();
    assert!(report.document("Shapes.vss").unwrap().reopened);

    let saved = host.save_all().unwrap();
    assert!(saved.contains(&"Shapes.vss".to_string()));
    host.close_all();

    let stencil = open(
        &PackageHost::new(),
        folder.normalized().join("stencils/Shapes.vss.json"),
        OpenMode::READ_ONLY,
    );
    let helpers = snapshot(&stencil).remove("ShapeHelpers").unwrap();
    assert_eq!(helpers.1, "Sub Place()\r\n    ' moved\r\nEnd Sub");
}

#[test]
fn test_read_only_root_is_reopened_and_old_handle_closed() {
    let folder = package();
    folder.write(
        "vba/Extra.bas",
        "Attribute VB_Name = \"Extra\"\r\nSub Extra()\r\nEnd Sub\r\n",
    );
    let host = PackageHost::new();
    let document = open(
        &host,
        folder.normalized().join("Drawing1.vsd.toml"),
        OpenMode::READ_ONLY,
    );
    let stale = document.clone();

    Importer::new()
        .run(document, &folder.normalized().join("vba"), &SyncSettings::default())
        .unwrap();

    assert!(stale.is_closed());
    let reopened = host.document("Drawing1.vsd").unwrap();
    assert!(!reopened.is_read_only());
    assert!(snapshot(&reopened).contains_key("Extra"));
}

#[test]
fn test_this_document_text_is_mirrored_verbatim() {
    let folder = package();
    let host = PackageHost::new();
    let document = open(
        &host,
        folder.normalized().join("Drawing1.vsd.toml"),
        OpenMode::READ_WRITE,
    );

    Exporter::new()
        .run(document.clone(), &folder.normalized().join("vba"), &SyncSettings::default())
        .unwrap();
    assert_eq!(
        folder.read("vba/ThisDocument.bas"),
        "Private Sub Document_Opened(ByVal doc As IVDocument)\r\n    Init\r\nEnd Sub"
    );

    folder.write("vba/ThisDocument.bas", "' replaced\r\nOption Explicit");
    Importer::new()
        .run(document.clone(), &folder.normalized().join("vba"), &SyncSettings::default())
        .unwrap();

    let (_, code) = snapshot(&document).remove("ThisDocument").unwrap();
    assert_eq!(code, "' replaced\r\nOption Explicit");
}

#[test]
fn test_ansi_this_document_does_not_abort_import() {
    let folder = package();
    folder.write(
        "vba/Added.bas",
        "Attribute VB_Name = \"Added\"\r\nSub Added()\r\nEnd Sub\r\n",
    );
    std::fs::write(
        folder.path("vba/ThisDocument.bas"),
        b"' caf\xe9\r\nSub A()\r\nEnd Sub",
    )
    .unwrap();
    let host = PackageHost::new();
    let document = open(
        &host,
        folder.normalized().join("Drawing1.vsd.toml"),
        OpenMode::READ_WRITE,
    );

    let report = Importer::new()
        .run(document.clone(), &folder.normalized().join("vba"), &SyncSettings::default())
        .unwrap();

    assert!(report.documents[0].this_document_replaced);
    let mut components = snapshot(&document);
    assert!(components.contains_key("Added"));
    let (_, code) = components.remove("ThisDocument").unwrap();
    assert_eq!(code, "' caf\u{FFFD}\r\nSub A()\r\nEnd Sub");
}
