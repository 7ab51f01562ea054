// Integration testing can be done either by calling library functions directly or by invoking your CLI as a subprocess.
use hatake::{
    create, vcs::VersionControlError, Dependency, ProjectSpec, ScaffoldError, ScaffoldOptions,
    VersionControl,
};
use predicates::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

const DIRECTORIES: [&str; 6] = [
    "data/raw",
    "data/processed",
    "notebooks",
    "src",
    "results/figures",
    "results/tables",
];

/// Every path under `root` with the bytes of each file, sorted by path.
fn snapshot(root: &Path) -> Vec<(PathBuf, Option<Vec<u8>>)> {
    let mut entries: Vec<(PathBuf, Option<Vec<u8>>)> = WalkDir::new(root)
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let contents = entry
                .file_type()
                .is_file()
                .then(|| fs::read(entry.path()).unwrap());
            (entry.path().to_path_buf(), contents)
        })
        .collect();
    entries.sort();
    entries
}

fn hatake() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("hatake").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn scaffolds_exactly_the_fixed_directories() {
    let tmp = tempfile::tempdir().unwrap();

    create(
        &ProjectSpec::new("my-project", tmp.path()),
        &ScaffoldOptions::default(),
    )
    .unwrap();

    let root = tmp.path().join("my-project");
    let mut leaf_directories: Vec<String> = WalkDir::new(&root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| {
            !fs::read_dir(entry.path())
                .unwrap()
                .any(|child| child.unwrap().file_type().unwrap().is_dir())
        })
        .map(|entry| {
            entry
                .path()
                .strip_prefix(&root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    leaf_directories.sort();

    let mut expected: Vec<String> = DIRECTORIES.iter().map(|d| d.to_string()).collect();
    expected.sort();

    assert_eq!(leaf_directories, expected);
}

#[test]
fn created_paths_list_the_project_directories() {
    let tmp = tempfile::tempdir().unwrap();

    let scaffolded = create(
        &ProjectSpec::new("my-project", tmp.path()),
        &ScaffoldOptions::default(),
    )
    .unwrap();

    for directory in DIRECTORIES {
        assert!(
            scaffolded
                .created
                .contains(tmp.path().join("my-project").join(directory)),
            "{directory} missing from created paths"
        );
    }
}

#[test]
fn second_run_is_refused_and_changes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let spec = ProjectSpec::new("my-project", tmp.path())
        .with_dependencies(vec![Dependency::new("pandas", "2.2.0")]);

    create(&spec, &ScaffoldOptions::default()).unwrap();
    let before = snapshot(tmp.path());

    let second = create(&spec, &ScaffoldOptions::default());

    assert!(matches!(second, Err(ScaffoldError::AlreadyExists { .. })));
    assert_eq!(snapshot(tmp.path()), before);
}

#[test]
fn otherwise_empty_directories_get_a_gitkeep() {
    let tmp = tempfile::tempdir().unwrap();

    create(
        &ProjectSpec::new("my-project", tmp.path()),
        &ScaffoldOptions::default(),
    )
    .unwrap();

    let root = tmp.path().join("my-project");
    for directory in ["data/raw", "data/processed", "notebooks", "results/figures", "results/tables"] {
        let marker = root.join(directory).join(".gitkeep");
        assert!(marker.is_file(), "{} missing", marker.display());
        assert_eq!(fs::read(&marker).unwrap().len(), 0);
    }
    assert!(root.join("src/__init__.py").is_file());
    assert!(!root.join("src/.gitkeep").exists());
}

#[test]
fn requirements_contain_exactly_the_pins() {
    let tmp = tempfile::tempdir().unwrap();
    let spec = ProjectSpec::new("my-project", tmp.path()).with_dependencies(vec![
        Dependency::new("pandas", "2.2.0"),
        Dependency::new("numpy", "1.26.3"),
    ]);

    create(&spec, &ScaffoldOptions::default()).unwrap();

    let requirements =
        fs::read_to_string(tmp.path().join("my-project/requirements.txt")).unwrap();
    assert_eq!(
        requirements.lines().collect::<Vec<_>>(),
        vec!["pandas==2.2.0", "numpy==1.26.3"]
    );
}

#[test]
fn invalid_name_creates_nothing() {
    let tmp = tempfile::tempdir().unwrap();

    let result = create(&ProjectSpec::new("a/b", tmp.path()), &ScaffoldOptions::default());

    assert!(matches!(result, Err(ScaffoldError::Invalid(_))));
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn version_control_commits_tracked_files_only() {
    let tmp = tempfile::tempdir().unwrap();
    let spec = ProjectSpec::new("my-project", tmp.path()).with_version_control(true);

    let scaffolded = create(&spec, &ScaffoldOptions::default()).unwrap();

    let VersionControl::Committed { commit } = &scaffolded.version_control else {
        panic!("expected a commit, got {:?}", scaffolded.version_control);
    };

    let repo = git2::Repository::open(tmp.path().join("my-project")).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(&head.id().to_string(), commit);
    assert_eq!(head.message(), Some("Initial commit"));

    let tree = head.tree().unwrap();
    for tracked in [
        "README.md",
        "requirements.txt",
        ".gitignore",
        "src/__init__.py",
        "data/raw/.gitkeep",
        "results/tables/.gitkeep",
    ] {
        assert!(tree.get_path(Path::new(tracked)).is_ok(), "{tracked} not committed");
    }
    assert!(tree.get_path(Path::new(".env")).is_err());
}

#[test]
fn version_control_failure_keeps_the_tree() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("my-project");
    fs::create_dir(&root).unwrap();
    // a plain file where the repository directory would go makes git init fail
    fs::write(root.join(".git"), "not a repository").unwrap();
    let spec = ProjectSpec::new("my-project", tmp.path()).with_version_control(true);
    let options = ScaffoldOptions {
        overwrite: true,
        ..ScaffoldOptions::default()
    };

    let scaffolded = create(&spec, &options).unwrap();

    assert!(
        matches!(
            scaffolded.version_control,
            VersionControl::Failed(VersionControlError::Init { .. })
        ),
        "expected an init failure, got {:?}",
        scaffolded.version_control
    );
    assert!(root.join("README.md").is_file());
    for directory in DIRECTORIES {
        assert!(root.join(directory).is_dir(), "{directory} missing");
    }
    assert_eq!(
        fs::read_to_string(root.join(".git")).unwrap(),
        "not a repository"
    );
}

#[test]
fn cli_new_reports_created_paths() {
    let tmp = tempfile::tempdir().unwrap();

    hatake()
        .arg("new")
        .arg("my-project")
        .arg("--dir")
        .arg(tmp.path())
        .args(["--dep", "pandas==2.2.0", "--dep", "numpy==1.26.3", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("requirements.txt"));

    let root = tmp.path().join("my-project");
    assert_eq!(
        fs::read_to_string(root.join("requirements.txt")).unwrap(),
        "pandas==2.2.0\nnumpy==1.26.3\n"
    );
    assert!(root.join("README.md").is_file());
}

#[test]
fn cli_new_refuses_existing_project() {
    let tmp = tempfile::tempdir().unwrap();

    for expect_success in [true, false] {
        let outcome = hatake()
            .args(["new", "my-project", "--yes", "--dir"])
            .arg(tmp.path())
            .assert();

        if expect_success {
            outcome.success();
        } else {
            outcome
                .failure()
                .stderr(predicate::str::contains("already_exists"));
        }
    }
}

#[test]
fn cli_new_rejects_invalid_name() {
    let tmp = tempfile::tempdir().unwrap();

    hatake()
        .args(["new", "a/b", "--yes", "--dir"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid_name"));

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn cli_rejects_malformed_dependency() {
    let tmp = tempfile::tempdir().unwrap();

    hatake()
        .args(["new", "my-project", "--yes", "--dep", "pandas", "--dir"])
        .arg(tmp.path())
        .assert()
        .failure();

    assert!(!tmp.path().join("my-project").exists());
}

#[test]
fn cli_plan_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();

    hatake()
        .args(["plan", "my-project", "--dir"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("README.md"))
        .stdout(predicate::str::contains(".gitkeep"));

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn cli_reads_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tmp.path().join("hatake.toml");
    fs::write(
        &config,
        "author = \"Ada Lovelace\"\n\n[dependencies]\npandas = \"2.1.0\"\nnumpy = \"1.26.3\"\n",
    )
    .unwrap();

    hatake()
        .args(["new", "my-project", "--yes", "--dep", "pandas==2.2.0", "--dir"])
        .arg(tmp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let root = tmp.path().join("my-project");
    assert_eq!(
        fs::read_to_string(root.join("requirements.txt")).unwrap(),
        "pandas==2.2.0\nnumpy==1.26.3\n"
    );
    assert!(fs::read_to_string(root.join("README.md"))
        .unwrap()
        .contains("Ada Lovelace"));
}
