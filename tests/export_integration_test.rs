use anyhow::Result;
use bbr_export::config::toml_config::AppConfig;
use bbr_export::domain::model::AddressQuery;
use bbr_export::{BbrDataExport, ExportEngine, OutputFormat, VacationHouseExport};
use httpmock::prelude::*;
use serde_json::json;

const OWNERSHIP_PAGE: &str = r#"
<html><body>
  <div class="ejedomsdataopslag-main-info">
    <div class="col-xs-12 col-sm-7">
      <h3>Salgspris 14-06-2016</h3>
      <p>2.450.000 kr.</p>
    </div>
  </div>
  <p>Skødedato: 01-07-2016 <a aria-controls="collapse4256">Vis</a></p>
</body></html>
"#;

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.registry.base_url = server.base_url();
    config.ownership.base_url = server.url("/ejendomsdata/0/10/0");
    config.http.timeout_seconds = 5;
    config
}

fn query() -> AddressQuery {
    AddressQuery {
        municipality_code: "101".to_string(),
        street_code: "0001".to_string(),
        house_number_from: "1".to_string(),
        house_number_to: "3".to_string(),
    }
}

/// Two addresses: "1" is complete, "3" has no registered buildings.
fn mount_registry(server: &MockServer) -> Vec<httpmock::Mock<'_>> {
    vec![
        server.mock(|when, then| {
            when.method(GET)
                .path("/adgangsadresser")
                .query_param("kommunekode", "101")
                .query_param("vejkode", "0001")
                .query_param("husnrfra", "1")
                .query_param("husnrtil", "3")
                .query_param("struktur", "flad");
            then.status(200).json_body(json!([
                {
                    "id": "addr-1",
                    "vejnavn": "Strandvejen",
                    "husnr": "1",
                    "esrejendomsnr": "123456",
                    "ejerlavkode": 2000175,
                    "matrikelnr": "1a"
                },
                {
                    "id": "addr-3",
                    "vejnavn": "Strandvejen",
                    "husnr": "3",
                    "esrejendomsnr": "654321",
                    "ejerlavkode": 2000175,
                    "matrikelnr": "3c"
                }
            ]));
        }),
        server.mock(|when, then| {
            when.method(GET)
                .path("/bbrlight/bygninger")
                .query_param("adgangsadresseid", "addr-1");
            then.status(200).json_body(json!([
                {
                    "Bygning_id": "bld-house",
                    "Bygningsnr": "1",
                    "BYG_ANVEND_KODE": 510,
                    "OPFOERELSE_AAR": 1950,
                    "OMBYG_AAR": 1988,
                    "BYG_BOLIG_ARL_SAML": 120,
                    "BYG_BEBYG_ARL": 95
                },
                {
                    "Bygning_id": "bld-carport",
                    "Bygningsnr": "2",
                    "BYG_ANVEND_KODE": 910,
                    "OPFOERELSE_AAR": 1975,
                    "OMBYG_AAR": null,
                    "BYG_BEBYG_ARL": 24
                }
            ]));
        }),
        server.mock(|when, then| {
            when.method(GET)
                .path("/bbrlight/bygninger")
                .query_param("adgangsadresseid", "addr-3");
            then.status(200).json_body(json!([]));
        }),
        server.mock(|when, then| {
            when.method(GET)
                .path("/bbrlight/etager")
                .query_param("bygningsid", "bld-house");
            then.status(200).json_body(json!([
                {"Etagebetegn": "ST", "SamletAreal": 95},
                {"Etagebetegn": "KL", "SamletAreal": 30}
            ]));
        }),
        server.mock(|when, then| {
            when.method(GET).path("/jordstykker/2000175/1a");
            then.status(200).json_body(json!({"registreretareal": 500}));
        }),
    ]
}

#[tokio::test]
async fn test_bbr_data_export_as_csv() -> Result<()> {
    let server = MockServer::start();
    let registry_mocks = mount_registry(&server);
    let page_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/ejendomsdata/0/10/0/123456");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(OWNERSHIP_PAGE);
    });

    let engine = ExportEngine::from_config(&config_for(&server))?;
    let output = engine.run(&BbrDataExport, &query(), OutputFormat::Csv).await?;

    for mock in &registry_mocks {
        mock.assert();
    }
    page_mock.assert();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Street Name,House No,Construction Year,Total Living Area,Total Basement Area,Total Ground Area,Deed Date,Sales Price,Sales Date",
            "Strandvejen,1,1950,120,30,500,01-07-2016,2450000,14-06-2016",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_vacation_house_export_as_tab() -> Result<()> {
    let server = MockServer::start();
    let _registry_mocks = mount_registry(&server);
    let page_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/ejendomsdata/");
        then.status(200).body("<html><body>Ingen oplysninger</body></html>");
    });

    let engine = ExportEngine::from_config(&config_for(&server))?;
    let output = engine
        .run(&VacationHouseExport, &query(), OutputFormat::Tab)
        .await?;

    page_mock.assert_hits(1);

    let lines: Vec<Vec<&str>> = output.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].len(), 18);
    assert_eq!(
        lines[1],
        vec![
            "Strandvejen", "1", "510", "1950", "1988", "120", "30", "500", "", "", "", "24",
            "1975", "", "", "0", "", "1a",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_unreachable_ownership_page_still_emits_row() -> Result<()> {
    let server = MockServer::start();
    let _registry_mocks = mount_registry(&server);
    let page_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/ejendomsdata/");
        then.status(503);
    });

    let engine = ExportEngine::from_config(&config_for(&server))?;
    let output = engine.run(&BbrDataExport, &query(), OutputFormat::Ssv).await?;

    page_mock.assert();
    assert_eq!(
        output.lines().nth(1),
        Some("Strandvejen;1;1950;120;30;500;;0;")
    );
    Ok(())
}

#[tokio::test]
async fn test_registry_outage_renders_empty_table() -> Result<()> {
    let server = MockServer::start();
    let address_mock = server.mock(|when, then| {
        when.method(GET).path("/adgangsadresser");
        then.status(502);
    });

    let engine = ExportEngine::from_config(&config_for(&server))?;
    let output = engine
        .run(&BbrDataExport, &query(), OutputFormat::Table)
        .await?;

    address_mock.assert();
    assert_eq!(output.lines().count(), 3);
    assert!(output.contains("| Street Name |"));
    Ok(())
}
