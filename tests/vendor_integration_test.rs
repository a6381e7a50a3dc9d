mod common;

use axum::http::StatusCode;
use common::{assert_envelope, TestApp};
use serde_json::{json, Value};

fn vendor_payload(name: &str, gst: &str, mobile: &str) -> Value {
    json!({
        "vendorName": name,
        "gstNumber": gst,
        "mobileNo": mobile,
        "address": "12 Ring Road, Surat",
    })
}

#[tokio::test]
async fn vendor_crud_round_trip() {
    let app = TestApp::spawn().await;

    let (status, payload) = app
        .post(
            "/vendor/add",
            vendor_payload("Shree Textiles", "24ABCDE1234F1Z5", "9876543210"),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_envelope(status, &payload);
    let vendor_id = payload["data"]["vendorID"].as_str().expect("id").to_string();

    let (status, payload) = app.get("/vendor/get").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["totalCount"], 1);
    assert_eq!(payload["data"]["vendors"][0]["vendorName"], "Shree Textiles");
    assert_eq!(payload["data"]["vendors"][0]["vendorID"], vendor_id.as_str());

    let (status, _) = app
        .put(
            &format!("/vendor/update/{}", vendor_id),
            vendor_payload("Shree Fabrics", "24ABCDE1234F1Z5", "9876543210"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, payload) = app.get("/vendor/get").await;
    assert_eq!(payload["data"]["vendors"][0]["vendorName"], "Shree Fabrics");

    let (status, _) = app
        .delete(&format!("/vendor/delete?vendorId={}", vendor_id))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, payload) = app.get("/vendor/get").await;
    assert_eq!(payload["data"]["totalCount"], 0);

    let (status, payload) = app
        .delete(&format!("/vendor/delete?vendorId={}", vendor_id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(status, &payload);
}

#[tokio::test]
async fn invalid_gst_number_is_rejected_before_any_write() {
    let app = TestApp::spawn().await;

    let (status, payload) = app
        .post(
            "/vendor/add",
            vendor_payload("Bad GST Vendor", "NOT-A-GST", "9876543210"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(status, &payload);
    let message = payload["statusMessage"].as_str().unwrap_or_default();
    assert!(message.contains("gst_number"), "got message: {}", message);

    let (_, payload) = app.get("/vendor/get").await;
    assert_eq!(payload["data"]["totalCount"], 0);
}

#[tokio::test]
async fn invalid_mobile_number_is_rejected() {
    let app = TestApp::spawn().await;

    // mobile numbers must be 10 digits starting 6-9
    for bad in ["12345", "5876543210", "98765432101"] {
        let (status, _) = app
            .post(
                "/vendor/add",
                vendor_payload("Vendor", "24ABCDE1234F1Z5", bad),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "mobile {}", bad);
    }
}

#[tokio::test]
async fn listing_supports_search_and_pagination() {
    let app = TestApp::spawn().await;

    let vendors = [
        ("Anand Mills", "24ABCDE1234F1Z5", "9876543210"),
        ("Bharat Looms", "27FGHIJ5678K2Z9", "9123456780"),
        ("Anand Weaves", "24KLMNO9012P3Z1", "8899776655"),
    ];
    for (name, gst, mobile) in vendors {
        let (status, _) = app.post("/vendor/add", vendor_payload(name, gst, mobile)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, payload) = app.get("/vendor/get?searchFilter=Anand").await;
    assert_eq!(payload["data"]["totalCount"], 2);

    let (_, payload) = app.get("/vendor/get?pageNumber=2&pageSize=2").await;
    assert_eq!(payload["data"]["totalCount"], 3);
    assert_eq!(payload["data"]["vendors"].as_array().unwrap().len(), 1);

    let (_, payload) = app.get("/vendor/get?searchFilter=9123456780").await;
    assert_eq!(payload["data"]["totalCount"], 1);
    assert_eq!(payload["data"]["vendors"][0]["vendorName"], "Bharat Looms");
}

#[tokio::test]
async fn vendor_dropdown_lists_active_vendors() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .post(
            "/vendor/add",
            vendor_payload("Dropdown Vendor", "24ABCDE1234F1Z5", "9876543210"),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, payload) = app.get("/vendor/get-all").await;
    assert_eq!(status, StatusCode::OK);
    let vendors = payload["data"]["vendors"].as_array().expect("vendors");
    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors[0]["vendorName"], "Dropdown Vendor");
}
