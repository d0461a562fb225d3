use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use solvpack::{
    AuxiliaryConfig, Config, Destination, Error, PackagingConfig, Pipeline, ReleaseConfig,
    TimestampOutcome,
};
use solvpack_fetch::{FetchError, Fetcher, HttpClient, Response};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

#[derive(Debug, thiserror::Error)]
#[error("mock transport: {0}")]
struct MockError(String);

struct MockClient {
    replies: RefCell<VecDeque<Response>>,
}

impl MockClient {
    fn serving(status: u16, body: Vec<u8>) -> Self {
        Self {
            replies: RefCell::new(VecDeque::from([Response { status, body }])),
        }
    }
}

impl HttpClient for MockClient {
    type Error = MockError;

    fn get(&self, _url: &str, _headers: &[(String, String)]) -> Result<Response, MockError> {
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| MockError("no more replies".into()))
    }
}

fn no_sleep(_: Duration) {}

fn fetcher(client: MockClient) -> Fetcher<MockClient> { Fetcher::new(client).with_sleeper(no_sleep) }

const SOLVER_BYTES: &[u8] = b"\x7fELF cbc 2.10.12";

fn solver_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer.add_directory("Cbc-2.10/bin/", SimpleFileOptions::default()).unwrap();
    writer.start_file("Cbc-2.10/bin/cbc", SimpleFileOptions::default()).unwrap();
    writer.write_all(SOLVER_BYTES).unwrap();
    writer.start_file("Cbc-2.10/README", SimpleFileOptions::default()).unwrap();
    writer.write_all(b"readme").unwrap();
    writer.finish().unwrap().into_inner()
}

fn write_file(path: &Path, content: &[u8]) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

fn base_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.target = Some("linux-x86_64".into());
    config.staging_dir = dir.path().join("staging");
    config.download.max_retries = 0;
    config
}

fn destinations(dir: &TempDir) -> Vec<Destination> {
    vec![
        Destination {
            label: "root".into(),
            path:  dir.path().join("dist/app/cbc"),
        },
        Destination {
            label: "internal".into(),
            path:  dir.path().join("dist/app/_internal/solver/cbc"),
        },
    ]
}

#[test]
fn downloaded_solver_is_bundled_packaged_and_released() {
    let dir = tempfile::tempdir().unwrap();
    let tzdata = write_file(&dir.path().join("tzdata/zoneinfo.zip"), b"tz");
    let future = SystemTime::now() + Duration::from_secs(365 * 24 * 3600);
    solvpack_fs::set_modified(&tzdata, future).unwrap();
    let app_dir = dir.path().join("dist/app");
    write_file(&app_dir.join("app"), b"application");

    let mut config = base_config(&dir);
    config.solver.download_url = Some("https://example.invalid/Cbc-2.10-linux.zip".into());
    config.solver.candidates = vec![dir.path().join("site-packages/pulp/solverdir/cbc")];
    config.bundle.destinations = destinations(&dir);
    config.auxiliary = AuxiliaryConfig {
        timestamps: vec![tzdata.clone()],
    };
    config.packaging = Some(PackagingConfig {
        name:           "app".into(),
        entry_script:   "app.py".into(),
        onefile:        false,
        hidden_imports: vec!["pulp".into()],
        solver_subdirs: vec![".".into(), "solver".into()],
        datas:          Vec::new(),
        spec_out:       Some(dir.path().join("build/spec.json")),
    });
    config.release = Some(ReleaseConfig {
        tag:          "v1.0.0".into(),
        name:         None,
        body:         "release notes".into(),
        assets:       Vec::new(),
        package_dir:  Some(app_dir.clone()),
        zip_out:      Some(dir.path().join("app.zip")),
        manifest_out: dir.path().join("release.json"),
    });

    let before: DateTime<Utc> = SystemTime::now().into();
    let report = Pipeline::new(config)
        .run_with(fetcher(MockClient::serving(200, solver_zip())))
        .unwrap();

    let download = report.download.as_ref().unwrap();
    assert_eq!(download.attempts, 1);
    assert_eq!(download.extracted.len(), 1);
    assert_eq!(report.artifact.size, SOLVER_BYTES.len() as u64);

    assert_eq!(report.bundle.copies.len(), 2);
    for copy in &report.bundle.copies {
        assert_eq!(fs::read(&copy.path).unwrap(), SOLVER_BYTES);
    }

    match &report.timestamps[..] {
        [TimestampOutcome::Normalized { previous, now, .. }] => {
            assert!(*previous > *now);
            assert!(*now >= before - chrono::Duration::seconds(1));
        }
        other => panic!("unexpected timestamp outcomes: {other:?}"),
    }

    let packaging = report.packaging.as_ref().unwrap();
    assert_eq!(packaging.binaries[0].source, app_dir.join("cbc"));
    assert!(dir.path().join("build/spec.json").is_file());

    let release = report.release.as_ref().unwrap();
    assert_eq!(release.assets[0].name, "app.zip");
    assert!(dir.path().join("release.json").is_file());

    assert!(report.staging.is_none());
    assert!(!dir.path().join("staging").exists());
}

#[test]
fn first_valid_candidate_wins() {
    let dir = tempfile::tempdir().unwrap();
    let solver = write_file(&dir.path().join("solver/cbc"), &[0u8; 1200]);
    let later = write_file(&dir.path().join("later/cbc"), b"other");

    let mut config = base_config(&dir);
    config.solver.candidates = vec![dir.path().join("pkg/cbc"), dir.path().join("solver"), later];
    config.bundle.destinations = destinations(&dir);

    let report = Pipeline::new(config)
        .run_with(fetcher(MockClient::serving(500, Vec::new())))
        .unwrap();

    assert!(report.download.is_none());
    assert_eq!(report.artifact.path, std::path::absolute(&solver).unwrap());
    assert_eq!(fs::metadata(dir.path().join("dist/app/cbc")).unwrap().len(), 1200);
}

#[test]
fn fallback_search_finds_nested_binary() {
    let dir = tempfile::tempdir().unwrap();
    let nested = write_file(&dir.path().join("build/a/b/c/cbc"), SOLVER_BYTES);
    write_file(&dir.path().join("build/empty/cbc"), b"");

    let mut config = base_config(&dir);
    config.solver.fallback_root = Some(dir.path().join("build"));

    let report = Pipeline::new(config)
        .run_with(fetcher(MockClient::serving(500, Vec::new())))
        .unwrap();

    assert_eq!(report.artifact.path, std::path::absolute(&nested).unwrap());
    assert!(report.bundle.copies.is_empty());
}

#[test]
fn missing_binary_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("build")).unwrap();

    let mut config = base_config(&dir);
    config.solver.candidates = vec![dir.path().join("pkg/cbc")];
    config.solver.fallback_root = Some(dir.path().join("build"));
    config.bundle.destinations = destinations(&dir);

    let err = Pipeline::new(config)
        .run_with(fetcher(MockClient::serving(500, Vec::new())))
        .unwrap_err();

    match err {
        Error::BinaryNotFound { name, probed, fallback_root } => {
            assert_eq!(name, "cbc");
            assert_eq!(probed, [dir.path().join("pkg/cbc")]);
            assert_eq!(fallback_root, Some(dir.path().join("build")));
        }
        other => panic!("expected BinaryNotFound, got {other:?}"),
    }
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn failed_download_aborts_before_bundling() {
    let dir = tempfile::tempdir().unwrap();
    let installed = write_file(&dir.path().join("solver/cbc"), SOLVER_BYTES);

    let mut config = base_config(&dir);
    config.solver.download_url = Some("https://example.invalid/missing.zip".into());
    config.solver.candidates = vec![installed];
    config.bundle.destinations = destinations(&dir);

    let err = Pipeline::new(config)
        .run_with(fetcher(MockClient::serving(404, b"not found".to_vec())))
        .unwrap_err();

    assert!(matches!(err, Error::Download(FetchError::Http { status: 404, .. })));
    assert!(!dir.path().join("dist").exists());
    assert!(!dir.path().join("staging").exists());
}

#[test]
fn html_payload_is_not_an_archive() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = base_config(&dir);
    config.solver.download_url = Some("https://example.invalid/login".into());

    let err = Pipeline::new(config)
        .run_with(fetcher(MockClient::serving(200, b"<html>sign in</html>".to_vec())))
        .unwrap_err();

    assert!(matches!(err, Error::Download(FetchError::NotAnArchive { .. })));
}

#[test]
fn staging_kept_when_nothing_is_bundled() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = base_config(&dir);
    config.solver.download_url = Some("https://example.invalid/Cbc-2.10-linux.zip".into());

    let report = Pipeline::new(config)
        .run_with(fetcher(MockClient::serving(200, solver_zip())))
        .unwrap();

    let staging = report.staging.unwrap();
    assert!(staging.starts_with(dir.path().join("staging")));
    assert!(staging.join("extract/Cbc-2.10/bin/cbc").is_file());
    assert!(report.artifact.path.starts_with(std::path::absolute(&staging).unwrap()));
}

#[test]
fn missing_auxiliary_file_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let installed = write_file(&dir.path().join("solver/cbc"), SOLVER_BYTES);
    let absent = dir.path().join("tzdata/zoneinfo.zip");

    let mut config = base_config(&dir);
    config.solver.candidates = vec![installed];
    config.auxiliary.timestamps = vec![absent.clone()];

    let report = Pipeline::new(config)
        .run_with(fetcher(MockClient::serving(500, Vec::new())))
        .unwrap();

    assert_eq!(report.timestamps, [TimestampOutcome::Missing { path: absent }]);
}

#[test]
fn binaries_left_by_an_earlier_run_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("staging/extract/Cbc-2.09/bin/cbc"), b"OLD SOLVER");
    let kept = write_file(&dir.path().join("staging/run-old/extract/Cbc-2.09/bin/cbc"), b"OLD SOLVER");

    let mut config = base_config(&dir);
    config.solver.download_url = Some("https://example.invalid/Cbc-2.10-linux.zip".into());
    config.bundle.destinations = destinations(&dir);

    let report = Pipeline::new(config)
        .run_with(fetcher(MockClient::serving(200, solver_zip())))
        .unwrap();

    let extracted = &report.download.as_ref().unwrap().extracted;
    assert_eq!(extracted.len(), 1);
    assert!(extracted[0].ends_with("extract/Cbc-2.10/bin/cbc"));
    for copy in &report.bundle.copies {
        assert_eq!(fs::read(&copy.path).unwrap(), SOLVER_BYTES);
    }
    assert_eq!(fs::read(kept).unwrap(), b"OLD SOLVER");
}

#[test]
fn existing_staging_root_is_left_intact() {
    let dir = tempfile::tempdir().unwrap();
    let build = dir.path().join("build");
    let important = write_file(&build.join("important.txt"), b"keep me");

    let mut config = base_config(&dir);
    config.staging_dir = build.clone();
    config.solver.download_url = Some("https://example.invalid/Cbc-2.10-linux.zip".into());
    config.bundle.destinations = destinations(&dir);

    let report = Pipeline::new(config)
        .run_with(fetcher(MockClient::serving(200, solver_zip())))
        .unwrap();

    assert!(report.staging.is_none());
    assert_eq!(fs::read(&important).unwrap(), b"keep me");
    let left: Vec<_> = fs::read_dir(&build).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert_eq!(left, ["important.txt"]);
}
