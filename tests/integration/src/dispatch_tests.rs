//! Command dispatch against package documents
//!
//! Settings chosen through the dispatcher live in the document metadata
//! and survive a save and reopen.

use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::VecDeque;
use vba_core::{
    Command, CommandDispatcher, CommandOutcome, DocumentHandle, FolderPicker,
    MetadataSettingsStore, SETTINGS_KEY, SettingsStore,
};
use vba_package::{OpenMode, PackageDocument, PackageHost};
use vba_test_utils::TestFolder;

const DRAWING: &str = r#"
kind = "drawing"

[[project.components]]
name = "ThisDocument"
kind = "document"

[[project.components]]
name = "Module1"
kind = "standard"
code = "Sub Main()\nEnd Sub"
"#;

/// Answers folder prompts from a queue and counts how often it was asked.
#[derive(Default)]
struct QueuedPicker {
    answers: VecDeque<Option<String>>,
    asked: usize,
}

impl QueuedPicker {
    fn answering(answers: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: 0,
        }
    }
}

impl FolderPicker for &mut QueuedPicker {
    fn pick_folder(&mut self, _initial: &str) -> Option<String> {
        self.asked += 1;
        self.answers.pop_front().flatten()
    }
}

fn drawing(folder: &TestFolder, host: &PackageHost) -> PackageDocument {
    folder.write("Drawing1.vsd.toml", DRAWING);
    host.open(
        &folder.normalized().join("Drawing1.vsd.toml"),
        OpenMode::READ_WRITE,
    )
    .unwrap()
}

#[test]
fn test_first_export_asks_then_remembers_folder() {
    let folder = TestFolder::new();
    let host = PackageHost::new();
    let document = drawing(&folder, &host);
    let target = folder.path("vba").to_string_lossy().to_string();
    let mut picker = QueuedPicker::answering([Some(target.clone())]);

    {
        let mut dispatcher = CommandDispatcher::new(MetadataSettingsStore::new(), &mut picker);
        let outcome = dispatcher.dispatch(Some(&document), Command::ExportVba).unwrap();
        assert!(matches!(outcome, CommandOutcome::Exported { .. }));

        dispatcher.dispatch(Some(&document), Command::ExportVba).unwrap();
    }

    assert_eq!(picker.asked, 1);
    folder.assert_exists("vba/Module1.bas");

    host.save_all().unwrap();
    host.close_all();
    let reopened = PackageHost::new()
        .open(
            &folder.normalized().join("Drawing1.vsd.toml"),
            OpenMode::READ_ONLY,
        )
        .unwrap();
    let settings = MetadataSettingsStore::new().load_or_create(&reopened).unwrap();
    assert_eq!(settings.target_folder, target);

    let raw = reopened.metadata(SETTINGS_KEY).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["targetFolder"], target.as_str());
}

#[rstest]
#[case(Command::ExportVbaFolder)]
#[case(Command::ImportVbaFolder)]
fn test_cancelled_picker_leaves_document_untouched(#[case] command: Command) {
    let folder = TestFolder::new();
    let host = PackageHost::new();
    let document = drawing(&folder, &host);
    let mut picker = QueuedPicker::answering([None]);

    let mut dispatcher = CommandDispatcher::new(MetadataSettingsStore::new(), &mut picker);
    let outcome = dispatcher.dispatch(Some(&document), command).unwrap();

    assert_eq!(outcome, CommandOutcome::Cancelled);
    assert!(!document.is_dirty());
    assert_eq!(document.metadata(SETTINGS_KEY).unwrap(), None);
}

#[test]
fn test_toggles_are_stored_in_document() {
    let folder = TestFolder::new();
    let host = PackageHost::new();
    let document = drawing(&folder, &host);
    let mut picker = QueuedPicker::default();
    let mut dispatcher = CommandDispatcher::new(MetadataSettingsStore::new(), &mut picker);

    dispatcher
        .dispatch(Some(&document), Command::ToggleClearBeforeImport)
        .unwrap();

    assert!(
        dispatcher
            .is_checked(Some(&document), Command::ToggleClearBeforeImport)
            .unwrap()
    );
    assert!(
        !dispatcher
            .is_checked(Some(&document), Command::ToggleIncludeStencils)
            .unwrap()
    );
    assert!(document.is_dirty());
}

#[test]
fn test_import_through_dispatcher_uses_stored_flags() {
    let folder = TestFolder::new();
    folder.write(
        "vba/Fresh.bas",
        "Attribute VB_Name = \"Fresh\"\r\nSub Fresh()\r\nEnd Sub\r\n",
    );
    let host = PackageHost::new();
    let document = drawing(&folder, &host);
    let mut picker = QueuedPicker::answering([Some(folder.path("vba").to_string_lossy().to_string())]);
    let mut dispatcher = CommandDispatcher::new(MetadataSettingsStore::new(), &mut picker);

    dispatcher
        .dispatch(Some(&document), Command::ToggleClearBeforeImport)
        .unwrap();
    let outcome = dispatcher.dispatch(Some(&document), Command::ImportVba).unwrap();

    let CommandOutcome::Imported { report, .. } = outcome else {
        panic!("expected an import, got {outcome:?}");
    };
    let entry = report.document("Drawing1.vsd").unwrap();
    assert_eq!(entry.removed, vec!["Module1".to_string()]);
    assert_eq!(entry.imported, vec!["Fresh.bas".to_string()]);
}

#[test]
fn test_without_active_document_nothing_happens() {
    let mut picker = QueuedPicker::default();
    let mut dispatcher = CommandDispatcher::new(MetadataSettingsStore::new(), &mut picker);

    let outcome = dispatcher
        .dispatch::<PackageDocument>(None, Command::ExportVba)
        .unwrap();

    assert_eq!(outcome, CommandOutcome::NoActiveDocument);
    assert!(!dispatcher.is_enabled::<PackageDocument>(None, Command::ImportVba));
}
