use instance_ranker::core::probe::url::{
    build_probe_url, instance_origin, normalize_base_url, validate_instance_url,
};

#[test]
fn test_normalize_base_url() {
    assert_eq!(normalize_base_url("https://yt.example/"), "https://yt.example");
    assert_eq!(normalize_base_url("https://yt.example///"), "https://yt.example");
    assert_eq!(normalize_base_url("  https://yt.example "), "https://yt.example");
    assert_eq!(normalize_base_url("https://yt.example"), "https://yt.example");
}

#[test]
fn test_build_probe_url() {
    assert_eq!(
        build_probe_url("https://yt.example/", "/streams/abc"),
        "https://yt.example/streams/abc"
    );
    assert_eq!(
        build_probe_url("https://yt.example", "api/v1/videos/abc"),
        "https://yt.example/api/v1/videos/abc"
    );
}

#[test]
fn test_instance_origin() {
    assert_eq!(instance_origin("https://yt.example/sub/path").unwrap(), "https://yt.example");
    assert_eq!(instance_origin("https://yt.example:443").unwrap(), "https://yt.example");
    assert_eq!(instance_origin("http://localhost:3000/").unwrap(), "http://localhost:3000");
    assert!(instance_origin("not a url").is_err());
}

#[test]
fn test_validate_instance_url() {
    assert!(validate_instance_url("https://yt.example").is_ok());
    assert!(validate_instance_url("http://10.0.0.2:3000").is_ok());
    assert!(validate_instance_url("ftp://yt.example").is_err());
    assert!(validate_instance_url("yt.example").is_err());
}
