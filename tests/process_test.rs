#![cfg(unix)]

use container_activity::errors::Error;
use container_activity::process::{write_process_table, TopOptions, UNKNOWN_NAME};

pub mod common;
use crate::common::*;

#[tokio::test]
async fn top_processes_test() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("docker.sock");
    let body = r#"{"Titles":["USER","PID","%CPU","COMMAND"],"Processes":[["root","13642","0.0","sleep 600"]]}"#;

    let server = serve_once(&socket, http_response("200 OK", body));
    let docker = connect(&socket);

    let result = docker
        .top_processes_raw("a1b2c3d4e5f6", Some(TopOptions { ps_args: "aux" }))
        .await
        .unwrap();
    assert_eq!(&result[..], body.as_bytes());

    let request = server.await.unwrap();
    assert!(
        request.starts_with("GET /v1.41/containers/a1b2c3d4e5f6/top?ps_args=aux HTTP/1.1\r\n"),
        "{request}"
    );
}

#[tokio::test]
async fn container_processes_test() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("docker.sock");
    let listing = r#"[
        {"Id":"a1b2c3d4e5f6a1b2c3d4","Names":["/web"],"Image":"nginx:latest"},
        {"Id":"bbbbbbbbbbbbbbbbbbbb","Names":["/broken"]},
        {"Id":"cccccccccccccccccccc","Names":[],"Image":"alpine"},
        {"Id":"dddddddddddddddddddd","Names":["/gone"],"Image":"busybox"},
        {"Id":"eeeeeeeeeeeeeeeeeeee","Names":["/odd"],"Image":"busybox"}
    ]"#;

    let server = serve_sequence(
        &socket,
        vec![
            http_response("200 OK", listing),
            http_response(
                "200 OK",
                r#"{"Titles":["UID","PID","PPID","CMD"],"Processes":[["root","100","1","nginx: master"],["101","101","100","nginx: worker"]]}"#,
            ),
            http_response(
                "200 OK",
                r#"{"Titles":["PID","COMMAND"],"Processes":[["200","sleep 60"]]}"#,
            ),
            http_response(
                "409 Conflict",
                r#"{"message":"container dddddddddddd is not running"}"#,
            ),
            http_response(
                "200 OK",
                r#"{"Titles":["USER","TIME"],"Processes":[["root","00:00"]]}"#,
            ),
        ],
    );
    let docker = connect(&socket);

    let rows = docker.container_processes(12).await.unwrap();

    let mut out = Vec::new();
    write_process_table(&rows, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!(
            "HOST_PID\tNAME\tCONTAINER_ID\tCONTAINER_NAME\tCONTAINER_IMAGE\n\
             100\tnginx: master\ta1b2c3d4e5f6\tweb\tnginx:latest\n\
             101\tnginx: worker\ta1b2c3d4e5f6\tweb\tnginx:latest\n\
             200\tsleep 60\tcccccccccccc\t{UNKNOWN_NAME}\talpine\n"
        )
    );

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 5);
    assert!(requests[0].starts_with("GET /v1.41/containers/json?"), "{}", requests[0]);
    assert!(requests[1].starts_with("GET /v1.41/containers/a1b2c3d4e5f6a1b2c3d4/top HTTP/1.1\r\n"));
    assert!(requests[2].starts_with("GET /v1.41/containers/cccccccccccccccccccc/top HTTP/1.1\r\n"));
    assert!(requests[3].starts_with("GET /v1.41/containers/dddddddddddddddddddd/top HTTP/1.1\r\n"));
    assert!(requests[4].starts_with("GET /v1.41/containers/eeeeeeeeeeeeeeeeeeee/top HTTP/1.1\r\n"));
}

#[tokio::test]
async fn container_processes_listing_failure_test() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("docker.sock");

    let _server = serve_once(&socket, http_response("200 OK", r#"{"message":"error"}"#));
    let docker = connect(&socket);

    let result = docker.container_processes(12).await;

    assert!(matches!(
        result,
        Err(Error::JsonShapeError { found: "an object" })
    ));
}
