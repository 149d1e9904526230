//! Tests for the Exporter

use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use vba_core::{ComponentKind, DocumentKind, Exporter, SyncSettings};
use vba_test_utils::{FakeHost, TestFolder};

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn sample_drawing(host: &FakeHost) {
    host.document("Drawing1.vsd", DocumentKind::Drawing)
        .this_document("Private Sub Document_Opened(ByVal doc As IVDocument)\r\nEnd Sub")
        .module("Module1", ComponentKind::Standard, "Sub Main()\r\nEnd Sub")
        .module("Class1", ComponentKind::Class, "Public Value As Long")
        .module("Form1", ComponentKind::Form, "Private Sub UserForm_Click()\r\nEnd Sub")
        .module("Designer1", ComponentKind::Other, "")
        .docked("Shapes.vss")
        .open();
    host.document("Shapes.vss", DocumentKind::Stencil)
        .module("StencilModule", ComponentKind::Standard, "Sub S()\r\nEnd Sub")
        .open();
}

#[test]
fn test_export_writes_one_file_per_classified_component() {
    let host = FakeHost::new();
    sample_drawing(&host);
    let folder = TestFolder::new();

    let report = Exporter::new()
        .run(host.handle("Drawing1.vsd"), &folder.normalized(), &SyncSettings::default())
        .unwrap();

    assert_eq!(
        folder.file_names(""),
        names(&["Class1.cls", "Form1.frm", "Module1.bas", "ThisDocument.bas"])
    );
    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.files_written(), 4);
}

#[test]
fn test_export_this_document_text_is_verbatim() {
    let host = FakeHost::new();
    sample_drawing(&host);
    let folder = TestFolder::new();

    Exporter::new()
        .run(host.handle("Drawing1.vsd"), &folder.normalized(), &SyncSettings::default())
        .unwrap();

    assert_eq!(
        folder.read("ThisDocument.bas"),
        "Private Sub Document_Opened(ByVal doc As IVDocument)\r\nEnd Sub"
    );
}

#[test]
fn test_export_empty_this_document_writes_no_file() {
    let host = FakeHost::new();
    host.document("Drawing1.vsd", DocumentKind::Drawing)
        .module("Module1", ComponentKind::Standard, "Sub A()\r\nEnd Sub")
        .open();
    let folder = TestFolder::new();

    Exporter::new()
        .run(host.handle("Drawing1.vsd"), &folder.normalized(), &SyncSettings::default())
        .unwrap();

    folder.assert_missing("ThisDocument.bas");
    folder.assert_exists("Module1.bas");
}

#[test]
fn test_export_creates_missing_target_folder() {
    let host = FakeHost::new();
    sample_drawing(&host);
    let folder = TestFolder::new();
    let target = folder.normalized().join("out/vba");

    Exporter::new()
        .run(host.handle("Drawing1.vsd"), &target, &SyncSettings::default())
        .unwrap();

    folder.assert_exists("out/vba/Module1.bas");
}

#[test]
fn test_export_includes_stencils_in_subfolders() {
    let host = FakeHost::new();
    sample_drawing(&host);
    let folder = TestFolder::new();
    let settings = SyncSettings {
        include_stencils: true,
        ..SyncSettings::default()
    };

    let report = Exporter::new()
        .run(host.handle("Drawing1.vsd"), &folder.normalized(), &settings)
        .unwrap();

    assert_eq!(folder.file_names("Shapes.vss"), names(&["StencilModule.bas"]));
    assert_eq!(report.documents.len(), 2);
    // The stencil's own modules never land in the root folder
    folder.assert_missing("StencilModule.bas");
}

#[test]
fn test_export_keeps_unrelated_files() {
    let host = FakeHost::new();
    sample_drawing(&host);
    let folder = TestFolder::new();
    folder.write("README.txt", "notes");
    folder.write("Module1.bas", "stale");

    Exporter::new()
        .run(host.handle("Drawing1.vsd"), &folder.normalized(), &SyncSettings::default())
        .unwrap();

    assert_eq!(folder.read("README.txt"), "notes");
    assert!(folder.read("Module1.bas").contains("Sub Main()"));
}

#[test]
fn test_export_skips_document_without_project() {
    let host = FakeHost::new();
    host.document("Drawing1.vsd", DocumentKind::Drawing)
        .without_project()
        .docked("Shapes.vss")
        .open();
    host.document("Shapes.vss", DocumentKind::Stencil)
        .module("StencilModule", ComponentKind::Standard, "Sub S()\r\nEnd Sub")
        .open();
    let folder = TestFolder::new();
    let settings = SyncSettings {
        include_stencils: true,
        ..SyncSettings::default()
    };

    let report = Exporter::new()
        .run(host.handle("Drawing1.vsd"), &folder.normalized(), &settings)
        .unwrap();

    assert!(report.document("Drawing1.vsd").unwrap().skipped);
    assert!(folder.file_names("").is_empty());
    // Siblings are still processed
    folder.assert_exists("Shapes.vss/StencilModule.bas");
}

#[test]
fn test_export_ignores_non_syncable_document_kind() {
    let host = FakeHost::new();
    host.document("Report.vsd", DocumentKind::Other)
        .module("Module1", ComponentKind::Standard, "Sub A()\r\nEnd Sub")
        .open();
    let folder = TestFolder::new();

    let report = Exporter::new()
        .run(host.handle("Report.vsd"), &folder.normalized(), &SyncSettings::default())
        .unwrap();

    assert!(report.documents.is_empty());
    assert!(folder.file_names("").is_empty());
}

#[test]
fn test_export_does_not_mutate_the_document() {
    let host = FakeHost::new();
    sample_drawing(&host);
    let before = host.components("Drawing1.vsd");
    let folder = TestFolder::new();

    Exporter::new()
        .run(host.handle("Drawing1.vsd"), &folder.normalized(), &SyncSettings::default())
        .unwrap();

    assert_eq!(host.components("Drawing1.vsd"), before);
}
