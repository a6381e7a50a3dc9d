mod common;

use axum::http::StatusCode;
use common::{assert_envelope, TestApp};
use serde_json::{json, Value};

async fn create_vendor(app: &TestApp) -> String {
    let (status, payload) = app
        .post(
            "/vendor/add",
            json!({
                "vendorName": "Shree Textiles",
                "gstNumber": "24ABCDE1234F1Z5",
                "mobileNo": "9876543210",
                "address": "12 Ring Road, Surat",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    payload["data"]["vendorID"].as_str().unwrap().to_string()
}

async fn create_item(app: &TestApp, vendor_id: &str, design_no: &str, cost: &str) -> String {
    let (status, payload) = app
        .post(
            "/item/add",
            json!({
                "designNo": design_no,
                "itemName": format!("Saree {}", design_no),
                "vendorID": vendor_id,
                "manufacturingCost": cost,
                "sellingPrice": "150",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    payload["data"]["itemID"].as_str().unwrap().to_string()
}

async fn create_party(app: &TestApp) -> String {
    let (status, payload) = app
        .post(
            "/party/add",
            json!({
                "partyName": "Mahesh Garments",
                "mobileNo": "9898989898",
                "gstNumber": "24PQRST5678G1Z3",
                "panNumber": "PQRST5678G",
                "aadharNumber": "123456789012",
                "stateID": 1,
                "cityID": 1,
                "address": "5 Market Street, Surat",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    payload["data"]["partyID"].as_str().unwrap().to_string()
}

fn decimal(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().expect("numeric string"),
        Value::Number(n) => n.as_f64().unwrap(),
        other => panic!("not a number: {}", other),
    }
}

#[tokio::test]
async fn inward_totals_and_vendor_payments() {
    let app = TestApp::spawn().await;
    let vendor_id = create_vendor(&app).await;
    let item_a = create_item(&app, &vendor_id, "D-100", "80").await;
    let item_b = create_item(&app, &vendor_id, "D-200", "40").await;

    let (_, payload) = app
        .get(&format!("/item/get-item-dropdown?vendorId={}", vendor_id))
        .await;
    let options = payload["data"]["items"].as_array().unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0]["designNo"], "D-100");

    // 2x100 + 3x50 = 350, opening payment 100 leaves 250 due
    let (status, payload) = app
        .post(
            "/inward/add",
            json!({
                "vendorID": vendor_id,
                "billNo": "INV-1",
                "challanNo": "CH-1",
                "inwardDate": "2025-06-01",
                "items": [
                    { "itemID": item_a, "quantity": 2, "price": "100" },
                    { "itemID": item_b, "quantity": 3, "price": "50" },
                ],
                "amountPaid": "100",
                "paidDate": "2025-06-01",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_envelope(status, &payload);

    let (_, payload) = app.get("/inward/get").await;
    assert_eq!(payload["data"]["totalCount"], 1);
    let inward = &payload["data"]["inwards"][0];
    assert_eq!(inward["vendorName"], "Shree Textiles");
    assert_eq!(inward["totalQuantity"], 5);
    assert_eq!(decimal(&inward["totalAmount"]), 350.0);
    assert_eq!(decimal(&inward["amountPaid"]), 100.0);
    assert_eq!(decimal(&inward["dueAmount"]), 250.0);
    let opening = inward["payments"].as_array().unwrap();
    assert_eq!(opening.len(), 1);
    assert_eq!(decimal(&opening[0]["amountPaid"]), 100.0);
    let inward_id = inward["inwardID"].as_str().unwrap().to_string();

    let (_, payload) = app
        .get(&format!("/inward/get-inward-dropdown?vendorId={}", vendor_id))
        .await;
    let options = payload["data"]["inwards"].as_array().unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(decimal(&options[0]["dueAmount"]), 250.0);

    // a payment beyond the due amount is refused
    let (status, _) = app
        .post(
            "/vendorPayment/add",
            json!({
                "inwardID": inward_id,
                "amountPaid": "300",
                "paidDate": "2025-06-05",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/vendorPayment/add",
            json!({
                "inwardID": inward_id,
                "amountPaid": "250",
                "paidDate": "2025-06-05",
                "remarks": "final settlement",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // settled bills drop out of the dropdown
    let (_, payload) = app
        .get(&format!("/inward/get-inward-dropdown?vendorId={}", vendor_id))
        .await;
    assert!(payload["data"]["inwards"].as_array().unwrap().is_empty());

    let (_, payload) = app.get("/vendorPayment/get").await;
    assert_eq!(payload["data"]["totalCount"], 2);
    let payments = payload["data"]["payments"].as_array().unwrap();
    assert!(payments
        .iter()
        .all(|p| p["billNo"] == "INV-1" && p["vendorName"] == "Shree Textiles"));
    // fully settled, so every payment row shows the whole picture
    for payment in payments {
        assert_eq!(decimal(&payment["totalPurchaseAmount"]), 350.0);
        assert_eq!(decimal(&payment["dueAmount"]), 0.0);
        assert_eq!(payment["items"].as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn bill_payments_flip_the_paid_flag_when_covered() {
    let app = TestApp::spawn().await;
    let vendor_id = create_vendor(&app).await;
    let item_a = create_item(&app, &vendor_id, "D-100", "80").await;
    let party_id = create_party(&app).await;

    // 2x135 = 270
    let (status, payload) = app
        .post(
            "/bill/add",
            json!({
                "partyID": party_id,
                "billNo": "B-1",
                "gstTypeID": 1,
                "billDate": "2025-06-02",
                "items": [ { "itemID": item_a, "quantity": 2, "price": "135" } ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let bill_id = payload["data"]["billID"].as_str().unwrap().to_string();

    let (_, payload) = app.get("/bill/get").await;
    let bill = &payload["data"]["bills"][0];
    assert_eq!(bill["partyName"], "Mahesh Garments");
    assert_eq!(decimal(&bill["totalAmount"]), 270.0);
    assert_eq!(bill["isPaid"], false);

    let (status, _) = app
        .post(
            "/billPayment/add",
            json!({
                "billID": bill_id,
                "partyID": party_id,
                "amountReceived": "200",
                "receivedDate": "2025-06-03",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, payload) = app.get("/bill/get").await;
    let bill = &payload["data"]["bills"][0];
    assert_eq!(bill["isPaid"], false);
    assert_eq!(decimal(&bill["dueAmount"]), 70.0);

    // receipts cannot exceed the outstanding amount
    let (status, _) = app
        .post(
            "/billPayment/add",
            json!({
                "billID": bill_id,
                "partyID": party_id,
                "amountReceived": "100",
                "receivedDate": "2025-06-04",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/billPayment/add",
            json!({
                "billID": bill_id,
                "partyID": party_id,
                "amountReceived": "70",
                "receivedDate": "2025-06-04",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, payload) = app.get("/bill/get").await;
    let bill = &payload["data"]["bills"][0];
    assert_eq!(bill["isPaid"], true);
    assert_eq!(decimal(&bill["dueAmount"]), 0.0);

    // the party statement carries the same history
    let (status, payload) = app
        .get(&format!("/party/getByPartyId?partyId={}", party_id))
        .await;
    assert_envelope(status, &payload);
    let details = &payload["data"];
    assert_eq!(details["partyName"], "Mahesh Garments");
    assert_eq!(decimal(&details["totalBillAmount"]), 270.0);
    assert_eq!(decimal(&details["totalReceivedAmount"]), 270.0);
    assert_eq!(decimal(&details["totalDueAmount"]), 0.0);
    let statement = details["bills"].as_array().unwrap();
    assert_eq!(statement.len(), 1);
    assert_eq!(statement[0]["billNo"], "B-1");
    assert_eq!(statement[0]["isPaid"], true);
}

#[tokio::test]
async fn reports_reflect_the_recorded_activity() {
    let app = TestApp::spawn().await;
    let vendor_id = create_vendor(&app).await;
    let item_a = create_item(&app, &vendor_id, "D-100", "80").await;
    let item_b = create_item(&app, &vendor_id, "D-200", "40").await;
    let party_id = create_party(&app).await;

    let (status, _) = app
        .post(
            "/inward/add",
            json!({
                "vendorID": vendor_id,
                "billNo": "INV-1",
                "challanNo": "CH-1",
                "inwardDate": "2025-06-01",
                "items": [
                    { "itemID": item_a, "quantity": 2, "price": "100" },
                    { "itemID": item_b, "quantity": 3, "price": "50" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/bill/add",
            json!({
                "partyID": party_id,
                "billNo": "B-1",
                "gstTypeID": 1,
                "billDate": "2025-06-02",
                "items": [
                    { "itemID": item_a, "quantity": 1, "price": "150" },
                    { "itemID": item_b, "quantity": 2, "price": "60" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // stock = inward minus billed, valued at manufacturing cost
    let (_, payload) = app.get("/reports/get-stockReport").await;
    let rows = payload["data"]["items"].as_array().unwrap();
    let d100 = rows.iter().find(|r| r["designNo"] == "D-100").unwrap();
    assert_eq!(d100["inwardQuantity"], 2);
    assert_eq!(d100["outwardQuantity"], 1);
    assert_eq!(d100["stockQuantity"], 1);
    assert_eq!(decimal(&d100["stockValue"]), 80.0);
    let d200 = rows.iter().find(|r| r["designNo"] == "D-200").unwrap();
    assert_eq!(d200["stockQuantity"], 1);
    assert_eq!(decimal(&d200["stockValue"]), 40.0);

    let (_, payload) = app
        .get("/reports/get-partySalesReport?fromDate=2025-06-01&toDate=2025-06-30")
        .await;
    assert_eq!(payload["data"]["totalCount"], 1);
    let row = &payload["data"]["parties"][0];
    assert_eq!(row["partyName"], "Mahesh Garments");
    assert_eq!(row["billCount"], 1);
    assert_eq!(decimal(&row["totalSales"]), 270.0);
    assert_eq!(decimal(&row["dueAmount"]), 270.0);
    assert!(row["lastPaymentDate"].is_null());

    let (_, payload) = app
        .get("/reports/get-vendorInwardReport?fromDate=2025-06-01&toDate=2025-06-30")
        .await;
    let row = &payload["data"]["vendors"][0];
    assert_eq!(row["vendorName"], "Shree Textiles");
    assert_eq!(row["inwardCount"], 1);
    assert_eq!(decimal(&row["totalPurchase"]), 350.0);
    assert_eq!(row["items"].as_array().unwrap().len(), 2);

    let (_, payload) = app
        .get("/reports/get-dashboard?fromDate=2025-06-01&toDate=2025-06-30")
        .await;
    let summary = &payload["data"];
    assert_eq!(summary["billCount"], 1);
    assert_eq!(summary["inwardCount"], 1);
    assert_eq!(summary["partyCount"], 1);
    assert_eq!(summary["billPaymentCount"], 0);
    assert_eq!(summary["vendorPaymentCount"], 0);
    assert_eq!(decimal(&summary["totalSales"]), 270.0);
    assert_eq!(decimal(&summary["totalPurchase"]), 350.0);
    // one of each design left in stock: 80 + 40
    assert_eq!(decimal(&summary["totalStockValue"]), 120.0);
    let recent_bills = summary["recentBills"].as_array().unwrap();
    assert_eq!(recent_bills.len(), 1);
    assert_eq!(recent_bills[0]["billNo"], "B-1");
    assert_eq!(recent_bills[0]["partyName"], "Mahesh Garments");
    assert_eq!(decimal(&recent_bills[0]["amount"]), 270.0);
    let recent_inwards = summary["recentInwards"].as_array().unwrap();
    assert_eq!(recent_inwards.len(), 1);
    assert_eq!(recent_inwards[0]["billNo"], "INV-1");
    assert_eq!(recent_inwards[0]["vendorName"], "Shree Textiles");
    assert_eq!(decimal(&recent_inwards[0]["amount"]), 350.0);

    // without a window the dashboard covers today only
    let (_, payload) = app.get("/reports/get-dashboard").await;
    assert_eq!(payload["data"]["billCount"], 0);
    assert_eq!(payload["data"]["inwardCount"], 0);
}

#[tokio::test]
async fn referenced_records_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let vendor_id = create_vendor(&app).await;
    let item_a = create_item(&app, &vendor_id, "D-100", "80").await;

    let (status, payload) = app
        .delete(&format!("/vendor/delete?vendorId={}", vendor_id))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_envelope(status, &payload);

    let (status, _) = app.delete(&format!("/item/delete?itemId={}", item_a)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .delete(&format!("/vendor/delete?vendorId={}", vendor_id))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bills_without_line_items_are_rejected() {
    let app = TestApp::spawn().await;
    let vendor_id = create_vendor(&app).await;
    let party_id = create_party(&app).await;

    let (status, payload) = app
        .post(
            "/inward/add",
            json!({
                "vendorID": vendor_id,
                "billNo": "INV-1",
                "challanNo": "CH-1",
                "inwardDate": "2025-06-01",
                "items": [],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(status, &payload);
    assert!(payload["statusMessage"]
        .as_str()
        .unwrap()
        .contains("items"));

    let (status, _) = app
        .post(
            "/bill/add",
            json!({
                "partyID": party_id,
                "billNo": "B-1",
                "gstTypeID": 1,
                "billDate": "2025-06-02",
                "items": [],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn updates_cannot_shrink_a_bill_below_its_payments() {
    let app = TestApp::spawn().await;
    let vendor_id = create_vendor(&app).await;
    let item_a = create_item(&app, &vendor_id, "D-100", "80").await;
    let party_id = create_party(&app).await;

    // inward of 350 with 300 already paid out
    let (status, payload) = app
        .post(
            "/inward/add",
            json!({
                "vendorID": vendor_id,
                "billNo": "INV-1",
                "challanNo": "CH-1",
                "inwardDate": "2025-06-01",
                "items": [ { "itemID": item_a, "quantity": 2, "price": "175" } ],
                "amountPaid": "300",
                "paidDate": "2025-06-01",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let inward_id = payload["data"]["inwardID"].as_str().unwrap().to_string();

    // shrinking the total to 50 would leave the due amount negative
    let (status, _) = app
        .put(
            &format!("/inward/update/{}", inward_id),
            json!({
                "vendorID": vendor_id,
                "billNo": "INV-1",
                "challanNo": "CH-1",
                "inwardDate": "2025-06-01",
                "items": [ { "itemID": item_a, "quantity": 1, "price": "50" } ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, payload) = app.get("/inward/get").await;
    assert_eq!(decimal(&payload["data"]["inwards"][0]["dueAmount"]), 50.0);

    // same guard on the outward side: bill of 270 with 200 received
    let (status, payload) = app
        .post(
            "/bill/add",
            json!({
                "partyID": party_id,
                "billNo": "B-1",
                "gstTypeID": 1,
                "billDate": "2025-06-02",
                "items": [ { "itemID": item_a, "quantity": 2, "price": "135" } ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let bill_id = payload["data"]["billID"].as_str().unwrap().to_string();

    let (status, _) = app
        .post(
            "/billPayment/add",
            json!({
                "billID": bill_id,
                "partyID": party_id,
                "amountReceived": "200",
                "receivedDate": "2025-06-03",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .put(
            &format!("/bill/update/{}", bill_id),
            json!({
                "partyID": party_id,
                "billNo": "B-1",
                "gstTypeID": 1,
                "billDate": "2025-06-02",
                "items": [ { "itemID": item_a, "quantity": 1, "price": "100" } ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // a total still covering the receipts goes through
    let (status, _) = app
        .put(
            &format!("/bill/update/{}", bill_id),
            json!({
                "partyID": party_id,
                "billNo": "B-1",
                "gstTypeID": 1,
                "billDate": "2025-06-02",
                "items": [ { "itemID": item_a, "quantity": 1, "price": "250" } ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, payload) = app.get("/bill/get").await;
    let bill = &payload["data"]["bills"][0];
    assert_eq!(decimal(&bill["dueAmount"]), 50.0);
    assert_eq!(bill["isPaid"], false);
}

#[tokio::test]
async fn state_and_city_lookups_serve_seeded_data() {
    let app = TestApp::spawn().await;

    let (status, payload) = app.get("/state/get").await;
    assert_eq!(status, StatusCode::OK);
    let states = payload["data"]["states"].as_array().unwrap();
    assert_eq!(states.len(), 5);
    assert!(states.iter().any(|s| s["stateName"] == "Gujarat"));

    let (_, payload) = app.get("/city/get?stateId=1").await;
    let cities = payload["data"]["cities"].as_array().unwrap();
    assert_eq!(cities.len(), 3);
    assert!(cities.iter().all(|c| c["stateID"] == 1));

    let (_, payload) = app.get("/city/get?cityName=Surat").await;
    let cities = payload["data"]["cities"].as_array().unwrap();
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0]["cityName"], "Surat");
}
