//! Integration tests for s3cache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Binary with a clean environment and a config path that does not exist
    fn s3cache(temp: &TempDir) -> Command {
        s3cache_with_config(&temp.path().join("none.toml"))
    }

    fn s3cache_with_config(config: &std::path::Path) -> Command {
        let mut cmd = cargo_bin_cmd!("s3cache");
        for var in [
            "ACTION",
            "BUCKET",
            "KEY",
            "ARTIFACTS",
            "STORAGE_CLASS",
            "S3CACHE_WORKDIR",
            "S3CACHE_CONFIG",
            "S3CACHE_LOG_FORMAT",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.arg("--config").arg(config);
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        s3cache(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("CI build cache on S3"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        s3cache(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("s3cache"));
    }

    #[test]
    fn invalid_action() {
        let temp = TempDir::new().unwrap();
        s3cache(&temp)
            .args(["--action", "upload", "--bucket", "b", "--key", "k"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Valid options are: [put, get, delete]",
            ));
    }

    #[test]
    fn put_without_artifacts_fails_before_upload() {
        let temp = TempDir::new().unwrap();
        s3cache(&temp)
            .args(["--action", "put", "--bucket", "b", "--key", "k"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No artifacts patterns provided"));
    }

    #[test]
    fn put_with_blank_artifacts_env_fails() {
        let temp = TempDir::new().unwrap();
        s3cache(&temp)
            .env("ACTION", "put")
            .env("BUCKET", "b")
            .env("KEY", "k")
            .env("ARTIFACTS", "\n  \n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No artifacts patterns provided"));
    }

    #[test]
    fn missing_bucket() {
        let temp = TempDir::new().unwrap();
        s3cache(&temp)
            .args(["--action", "get", "--key", "k"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Missing required setting: bucket"));
    }

    #[test]
    fn invalid_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "[s3\n").unwrap();

        s3cache_with_config(&path)
            .args(["--action", "get", "--bucket", "b", "--key", "k"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}

mod pipeline_tests {
    use s3cache::{Action, CacheError, CachePipeline, CacheRequest, MemoryStore, Outcome};
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zip::ZipArchive;

    const NONE: [&str; 0] = [];

    fn entry_names(blob: &[u8]) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(blob)).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn scenario_a_two_binaries_round_trip() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("build")).unwrap();
        fs::write(src.path().join("build/app.bin"), vec![0xAB; 4096]).unwrap();
        fs::write(src.path().join("build/lib.bin"), b"\x7fELF lib").unwrap();

        let store = MemoryStore::new().with_bucket("valid-bucket");
        let pipeline = CachePipeline::new(store, src.path());
        let put = CacheRequest::new(Action::Store, "valid-bucket", "build", None, ["build/*.bin"])
            .unwrap();
        pipeline.execute(&put).await.unwrap();

        let blob = pipeline.store().object("valid-bucket", "build.zip").unwrap();
        assert_eq!(entry_names(&blob), vec!["build/app.bin", "build/lib.bin"]);

        let dst = TempDir::new().unwrap();
        let restore = CachePipeline::new(MemoryStore::new(), dst.path());
        restore.store().insert("valid-bucket", "build.zip", blob);
        let get = CacheRequest::new(Action::Restore, "valid-bucket", "build", None, NONE).unwrap();
        let outcome = restore.execute(&get).await.unwrap();

        assert!(matches!(outcome, Outcome::Restored { entries: 2, .. }));
        assert_eq!(fs::read(dst.path().join("build/app.bin")).unwrap(), vec![0xAB; 4096]);
        assert_eq!(fs::read(dst.path().join("build/lib.bin")).unwrap(), b"\x7fELF lib");
    }

    #[tokio::test]
    async fn scenario_b_restore_missing_key() {
        let dst = TempDir::new().unwrap();
        let pipeline = CachePipeline::new(MemoryStore::new(), dst.path());
        let get = CacheRequest::new(Action::Restore, "ci", "missing-key", None, NONE).unwrap();

        assert_eq!(pipeline.execute(&get).await.unwrap(), Outcome::Miss);
        assert_eq!(fs::read_dir(dst.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn scenario_c_purge_missing_key() {
        let pipeline = CachePipeline::new(MemoryStore::new(), ".");
        let delete = CacheRequest::new(Action::Purge, "ci", "missing-key", None, NONE).unwrap();

        assert_eq!(pipeline.execute(&delete).await.unwrap(), Outcome::Purged);
        assert_eq!(pipeline.execute(&delete).await.unwrap(), Outcome::Purged);
    }

    #[test]
    fn scenario_d_single_empty_pattern() {
        let err = CacheRequest::new(Action::Store, "ci", "deps", None, [""]).unwrap_err();
        assert!(matches!(err, CacheError::NoArtifacts));
    }

    #[tokio::test]
    async fn directory_tree_round_trip() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("node_modules/a/lib")).unwrap();
        fs::create_dir_all(src.path().join("node_modules/.bin")).unwrap();
        fs::create_dir_all(src.path().join("node_modules/empty")).unwrap();
        fs::write(src.path().join("node_modules/a/lib/index.js"), b"exports.a = 1").unwrap();
        fs::write(src.path().join("node_modules/a/package.json"), b"{\"name\":\"a\"}").unwrap();
        fs::write(src.path().join("node_modules/.bin/a"), b"#!/bin/sh").unwrap();

        let pipeline = CachePipeline::new(MemoryStore::new(), src.path());
        let put = CacheRequest::new(Action::Store, "ci", "npm", None, ["node_modules"]).unwrap();
        pipeline.execute(&put).await.unwrap();
        let blob = pipeline.store().object("ci", "npm.zip").unwrap();

        let dst = TempDir::new().unwrap();
        let restore = CachePipeline::new(MemoryStore::new(), dst.path());
        restore.store().insert("ci", "npm.zip", blob);
        let get = CacheRequest::new(Action::Restore, "ci", "npm", None, NONE).unwrap();
        restore.execute(&get).await.unwrap();

        for rel in [
            "node_modules/a/lib/index.js",
            "node_modules/a/package.json",
            "node_modules/.bin/a",
        ] {
            assert_eq!(
                fs::read(dst.path().join(rel)).unwrap(),
                fs::read(src.path().join(rel)).unwrap(),
                "{} differs",
                rel
            );
        }
        assert!(dst.path().join("node_modules/empty").is_dir());
    }

    #[tokio::test]
    async fn corrupt_object_fails_restore() {
        let dst = TempDir::new().unwrap();
        let pipeline = CachePipeline::new(MemoryStore::new(), dst.path());
        pipeline.store().insert("ci", "bad.zip", "this is not a zip");
        let get = CacheRequest::new(Action::Restore, "ci", "bad", None, NONE).unwrap();

        let err = pipeline.execute(&get).await.unwrap_err();
        assert!(matches!(err, CacheError::ArchiveRead(_)));
    }
}

mod s3_acceptance {
    //! Runs against real S3 only when `S3_TEST_ACC=1` and `S3_TEST_BUCKET`
    //! are set, using the ambient AWS credentials.

    use s3cache::config::schema::S3Config;
    use s3cache::{RemoteStore, S3Store};

    fn acceptance_bucket() -> Option<String> {
        if std::env::var("S3_TEST_ACC").as_deref() != Ok("1") {
            return None;
        }
        std::env::var("S3_TEST_BUCKET").ok()
    }

    #[tokio::test]
    async fn object_lifecycle() {
        let Some(bucket) = acceptance_bucket() else {
            return;
        };
        let store = S3Store::from_config(&S3Config::default()).await;
        let key = format!("s3cache-acceptance-{}.zip", std::process::id());

        assert!(!store.exists(&bucket, &key).await.unwrap());
        store.put(&bucket, &key, b"payload".to_vec(), None).await.unwrap();
        assert!(store.exists(&bucket, &key).await.unwrap());
        assert_eq!(store.get(&bucket, &key).await.unwrap(), b"payload");
        store.delete(&bucket, &key).await.unwrap();
        store.delete(&bucket, &key).await.unwrap();
        assert!(!store.exists(&bucket, &key).await.unwrap());
    }
}
