use comps_lookup::{
    distance_matrix_url, lookup, parse_response, write_listing, ClientConfig, CompsClient,
    MapsConfig,
};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const SMALL_SAMPLE_XML: &str = include_str!("fixtures/deep_comps_small.xml");
const FULL_SAMPLE_XML: &str = include_str!("fixtures/deep_comps_25.xml");

#[tokio::test]
async fn test_listing_and_distance_matrix_for_small_sample() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webservice/GetDeepComps.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SMALL_SAMPLE_XML))
        .mount(&server)
        .await;

    let config = ClientConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        count: 3,
        ..Default::default()
    };
    let client = CompsClient::new(config).unwrap();
    let response = lookup(&client, &client.query(12345)).await.unwrap();

    let mut out = Vec::new();
    write_listing(&mut out, &response.comparables).unwrap();
    let listing = String::from_utf8(out).unwrap();

    assert_eq!(
        listing.lines().collect::<Vec<_>>(),
        vec![
            "10,20001,$2450,12 Elm St,3,2.5,1450",
            "8.5,20002,$1875,34 Oak Ave,2,1,980",
            "6.25,20003,$3200,56 Pine Rd,4,3,2100",
        ]
    );

    let url = distance_matrix_url(&response, &MapsConfig::new("maps-key")).unwrap();
    assert_eq!(
        url.as_str(),
        "https://maps.googleapis.com/maps/api/distancematrix/json?units=imperial\
         &origins=40.6655101%2C-73.89188969999998\
         &destinations=40.6905615%2C-73.9976592%7C40.659569%2C-73.933783%7C40.729029%2C-73.851524\
         &key=maps-key"
    );
}

#[test]
fn test_full_sample_listing_has_one_line_per_comparable() {
    let response = parse_response(FULL_SAMPLE_XML.as_bytes()).unwrap();
    assert_eq!(response.comparables.len(), 25);

    let mut out = Vec::new();
    write_listing(&mut out, &response.comparables).unwrap();
    let listing = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = listing.lines().collect();

    assert_eq!(lines.len(), 25);
    for (line, comp) in lines.iter().zip(&response.comparables) {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 7, "{line}");
        assert_eq!(fields[1], comp.zpid.to_string());
        assert_eq!(fields[2], format!("${}", comp.rent.amount));
        assert_eq!(fields[3], comp.address.street);
    }

    let url = distance_matrix_url(&response, &MapsConfig::new("k")).unwrap();
    let destinations = url
        .query_pairs()
        .find(|(k, _)| k == "destinations")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert_eq!(destinations.split('|').count(), 25);
}
