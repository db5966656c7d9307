use folder_importer::{
    clone_directory, run_import, ImportError, ImportRequest, NoticeKind, Stage,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn weapon_import_end_to_end() {
    let workspace = TempDir::new().unwrap();
    let assets = workspace.path().join("assets");
    let ext = workspace.path().join("ext");
    write(&assets.join("Weapon_A/Weapon_A.prefab"), "prefab");
    write(&assets.join("Weapon_A/Weapon_A_icon.png"), "icon");
    write(&ext.join("Weapon_A_sound.wav"), "sound");

    let request = ImportRequest::beside_source(assets.join("Weapon_A"))
        .with_find_replace("A", "B")
        .with_external_files([ext.join("Weapon_A_sound.wav")]);

    let result = run_import(&request).unwrap();

    let destination = assets.join("Weapon_B");
    assert_eq!(result.destination_folder, destination);
    assert_eq!(
        sorted_names(&destination),
        vec!["Weapon_A_sound.wav", "Weapon_B.prefab", "Weapon_B_icon.png"]
    );
    assert_eq!(
        fs::read_to_string(destination.join("Weapon_B.prefab")).unwrap(),
        "prefab"
    );
    assert_eq!(result.copied_in_stage(Stage::Clone), 2);
    assert_eq!(result.copied_in_stage(Stage::Merge), 1);
    assert_eq!(result.files_copied, 3);
    assert_eq!(result.files_renamed, 2);
    assert!(result.notices.is_empty());

    // Source folder is left as it was
    assert_eq!(
        sorted_names(&assets.join("Weapon_A")),
        vec!["Weapon_A.prefab", "Weapon_A_icon.png"]
    );
}

#[test]
fn nested_tree_is_cloned_and_renamed() {
    let workspace = TempDir::new().unwrap();
    let src = workspace.path().join("Hero_old");
    write(&src.join("Hero_old.mat"), "mat");
    write(&src.join("textures/Hero_old_diffuse.png"), "diffuse");
    write(&src.join("old_anims/run.anim"), "run");

    let request = ImportRequest::beside_source(&src).with_find_replace("old", "new");
    let result = run_import(&request).unwrap();

    let destination = workspace.path().join("Hero_new");
    assert!(destination.join("Hero_new.mat").is_file());
    assert!(destination.join("textures/Hero_new_diffuse.png").is_file());
    assert!(destination.join("new_anims/run.anim").is_file());
    assert_eq!(result.files_renamed, 3);
}

#[test]
fn empty_find_clones_without_renaming() {
    let workspace = TempDir::new().unwrap();
    let src = workspace.path().join("Props");
    let parent = workspace.path().join("copies");
    fs::create_dir_all(&parent).unwrap();
    write(&src.join("crate_old.fbx"), "fbx");

    let request = ImportRequest::new(&src, &parent);
    let result = run_import(&request).unwrap();

    assert_eq!(result.destination_folder, parent.join("Props"));
    assert!(parent.join("Props/crate_old.fbx").is_file());
    assert_eq!(result.files_renamed, 0);
}

#[test]
fn external_conflicts_are_reported_not_fatal() {
    let workspace = TempDir::new().unwrap();
    let src = workspace.path().join("Set_A");
    write(&src.join("texture.png"), "original");
    write(&workspace.path().join("ext/dir/texture.png"), "external");
    write(&workspace.path().join("ext/extra.txt"), "extra");

    let request = ImportRequest::beside_source(&src)
        .with_find_replace("A", "B")
        .with_external_files([
            workspace.path().join("ext/dir/texture.png"),
            workspace.path().join("ext/missing.txt"),
            workspace.path().join("ext/extra.txt"),
        ]);

    let result = run_import(&request).unwrap();
    let destination = workspace.path().join("Set_B");

    assert_eq!(
        fs::read_to_string(destination.join("texture.png")).unwrap(),
        "original"
    );
    assert!(destination.join("extra.txt").is_file());
    assert_eq!(result.skipped().count(), 1);
    assert_eq!(result.failures().count(), 1);
    assert!(result
        .notices
        .iter()
        .all(|notice| notice.stage == Stage::Merge));
    assert_eq!(result.notices[0].kind, NoticeKind::Skipped);
}

#[test]
fn collision_and_missing_source_fail_fast() {
    let workspace = TempDir::new().unwrap();
    let src = workspace.path().join("Tree_A");
    write(&src.join("Tree_A.prefab"), "");
    fs::create_dir_all(workspace.path().join("Tree_B")).unwrap();

    let request = ImportRequest::beside_source(&src).with_find_replace("A", "B");
    assert!(matches!(
        run_import(&request),
        Err(ImportError::AlreadyExists { .. })
    ));
    assert!(sorted_names(&workspace.path().join("Tree_B")).is_empty());

    let missing = ImportRequest::beside_source(workspace.path().join("Nope_A"))
        .with_find_replace("A", "B");
    assert!(matches!(
        run_import(&missing),
        Err(ImportError::NotFound { .. })
    ));
}

#[test]
fn cloner_is_idempotent() {
    let workspace = TempDir::new().unwrap();
    let src = workspace.path().join("src");
    write(&src.join("a.txt"), "a");
    write(&src.join("sub/b.txt"), "b");
    let dst = workspace.path().join("dst");

    let first = clone_directory(&src, &dst).unwrap();
    let second = clone_directory(&src, &dst).unwrap();

    assert_eq!(first.completed.len(), 2);
    assert!(second.completed.is_empty());
    assert_eq!(second.skipped_count(), 2);
}

#[test]
fn result_serializes_to_json() {
    let workspace = TempDir::new().unwrap();
    let src = workspace.path().join("Pack_A");
    write(&src.join("Pack_A.asset"), "");

    let request = ImportRequest::beside_source(&src).with_find_replace("A", "B");
    let result = run_import(&request).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["files_copied"], 1);
    assert_eq!(json["files_renamed"], 1);
    assert_eq!(json["copied_files"][0]["stage"], "clone");
    assert!(json["run_id"].is_string());
}

#[test]
fn relative_source_lands_beside_itself() {
    let workspace = TempDir::new().unwrap();
    write(&workspace.path().join("Weapon_A/Weapon_A.prefab"), "prefab");

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(workspace.path()).unwrap();
    let outcome = run_import(&ImportRequest::beside_source("Weapon_A").with_find_replace("A", "B"));
    std::env::set_current_dir(previous).unwrap();

    let result = outcome.unwrap();
    assert_eq!(result.destination_folder, Path::new(".").join("Weapon_B"));
    assert!(workspace.path().join("Weapon_B/Weapon_B.prefab").is_file());
}
