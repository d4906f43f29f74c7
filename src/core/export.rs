use crate::domain::ports::Storage;
use crate::domain::services::TierList;
use crate::utils::error::{Result, StierError};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct TierRow<'a> {
    tier: &'a str,
    range: &'a str,
    color: &'a str,
    slug: &'a str,
    title: &'a str,
    category: &'a str,
    average: String,
    recommend_percent: u8,
    count: usize,
}

fn rows(list: &TierList) -> impl Iterator<Item = TierRow<'_>> {
    list.non_empty().flat_map(|group| {
        group.products.iter().map(move |item| TierRow {
            tier: group.tier.label(),
            range: group.range,
            color: group.color,
            slug: &item.product.slug,
            title: &item.product.title,
            category: &item.product.category,
            average: format!("{:.1}", item.consensus.average),
            recommend_percent: item.consensus.recommend_percent,
            count: item.consensus.count,
        })
    })
}

fn render_delimited(list: &TierList, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    for row in rows(list) {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| StierError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| StierError::ProcessingError {
        message: format!("export is not valid UTF-8: {}", e),
    })
}

pub fn render_csv(list: &TierList) -> Result<String> {
    render_delimited(list, b',')
}

pub fn render_tsv(list: &TierList) -> Result<String> {
    render_delimited(list, b'\t')
}

/// Only non-empty tiers are included.
pub fn render_json(list: &TierList) -> Result<String> {
    let groups: Vec<_> = list.non_empty().collect();
    Ok(serde_json::to_string_pretty(&groups)?)
}

pub fn render(list: &TierList, format: &str) -> Result<String> {
    match format {
        "csv" => render_csv(list),
        "tsv" => render_tsv(list),
        "json" => render_json(list),
        other => Err(StierError::InvalidConfigValueError {
            field: "export.output_formats".to_string(),
            value: other.to_string(),
            reason: "Unsupported format".to_string(),
        }),
    }
}

/// Writes `tier_list.<format>` for each format and returns the written paths.
/// All formats are rendered up front; nothing is written if any of them fails.
pub async fn export_tier_list<S: Storage>(
    list: &TierList,
    formats: &[String],
    storage: &S,
) -> Result<Vec<String>> {
    let rendered = formats
        .iter()
        .map(|format| render(list, format).map(|body| (format, body)))
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::with_capacity(rendered.len());
    for (format, body) in rendered {
        let path = storage
            .write_file(&format!("tier_list.{}", format), body.as_bytes())
            .await?;
        tracing::info!("📁 Exported {} tier list to {}", format, path);
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Product;
    use crate::domain::services::{group_by_tier, score_product};
    use crate::domain::tier::ScorePolicy;

    fn sample_list() -> TierList {
        let product = |title: &str, slug: &str| Product {
            id: None,
            title: title.to_string(),
            slug: slug.to_string(),
            category: "Sneakers".to_string(),
            sku: None,
            image_url: None,
            price: Some("$220".to_string()),
            created_at: None,
            reviews: Vec::new(),
        };
        group_by_tier(vec![
            score_product(
                product("Jordan 1 Retro High OG Midnight Navy", "jordan-1-midnight-navy"),
                &[5.0, 5.0],
                ScorePolicy::Clamp,
            )
            .unwrap(),
            score_product(
                product("New Balance 550, White Green", "new-balance-550-white-green"),
                &[4.0, 3.0],
                ScorePolicy::Clamp,
            )
            .unwrap(),
        ])
    }

    #[test]
    fn test_csv_has_header_and_quoted_titles() {
        let csv = render_csv(&sample_list()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "tier,range,color,slug,title,category,average,recommend_percent,count"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("S+,9.5-10.0,#ff7f7e,jordan-1-midnight-navy"));
        assert!(lines[1].ends_with("10.0,100,2"));
        assert!(lines[2].contains("\"New Balance 550, White Green\""));
        assert!(lines[2].ends_with("7.0,50,2"));
    }

    #[test]
    fn test_tsv_uses_tabs() {
        let tsv = render_tsv(&sample_list()).unwrap();
        assert!(tsv.lines().next().unwrap().contains("tier\trange\tcolor"));
    }

    #[test]
    fn test_json_skips_empty_tiers() {
        let json = render_json(&sample_list()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let groups = value.as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["tier"], "S+");
        assert_eq!(groups[1]["tier"], "B");
    }

    #[test]
    fn test_unknown_format() {
        assert!(render(&sample_list(), "xlsx").is_err());
    }

    #[tokio::test]
    async fn test_bad_format_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = crate::adapters::LocalStorage::new(dir.path().to_string_lossy());
        let formats = vec!["csv".to_string(), "xlsx".to_string()];

        let err = export_tier_list(&sample_list(), &formats, &storage)
            .await
            .unwrap_err();
        assert!(matches!(err, StierError::InvalidConfigValueError { .. }));
        assert!(!dir.path().join("tier_list.csv").exists());
    }
}
