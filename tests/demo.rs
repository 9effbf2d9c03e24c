use shikimark::config::{BundlerPlugin, Config, Integration};
use shikimark::{data, document};
use std::path::Path;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[test]
fn test_render_demo_page() -> Result<()> {
    let config = Config::from_directory(Path::new("./demo/content"))?;
    assert_eq!(
        vec![Integration::Tailwind, Integration::Mdx, Integration::Sitemap],
        config.integrations,
    );

    let input = std::fs::read_to_string("./demo/content/pod-security.md")?;
    let page = document::render(
        &input,
        "content/pod-security.md",
        &config.site,
        &config.highlighter(),
    )?;

    assert_eq!(Some("Enforcing Pod Security Standards"), page.title());
    let languages: Vec<&str> = page
        .html
        .match_indices(r#"data-language=""#)
        .map(|(i, m)| {
            let rest = &page.html[i + m.len()..];
            &rest[..rest.find('"').unwrap_or(0)]
        })
        .collect();
    assert_eq!(vec!["yaml", "sh", ""], languages);
    assert_eq!(3, page.html.matches("word-wrap: break-word").count());
    assert!(page.html.contains(
        r#"href="https://kubernetes-security.cloud/content/network-policies.html""#
    ));
    Ok(())
}

#[test]
fn test_load_demo_data() -> Result<()> {
    let config = Config::from_directory(Path::new("./demo"))?;
    assert!(config.has_plugin(BundlerPlugin::Yaml));

    let data = data::load_directory(&config.data_directory)?;
    let authors = data
        .get("authors")
        .and_then(serde_yaml::Value::as_sequence)
        .map(Vec::len);
    assert_eq!(Some(2), authors);
    Ok(())
}
