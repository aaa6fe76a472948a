use std::path::Path;

use pcat_catalog::CatalogConfig;
use pcat_cli::validate::{render, run_validate, validate_root, OutputFormat, ValidateArgs};
use pcat_core::Category;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, text).unwrap();
}

fn pattern(title: &str, sibling: &str) -> String {
    format!(
        "# {title}\n\
         **Category:** Creational\n\
         \n\
         ## Definition\n\
         Related: [{sibling}]({sibling}.md#definition)\n\
         \n\
         ## Structure\n\
         ```rust\nstruct {title};\n```\n\
         \n\
         ## Pros & Cons\n\
         [Back to top](#top)\n"
    )
}

fn args(root: &Path) -> ValidateArgs {
    ValidateArgs {
        root: root.to_path_buf(),
        strict: true,
        format: OutputFormat::Text,
        config: None,
    }
}

#[test]
fn builder_prototype_adapter_catalog_passes() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "Creational/Builder.md", &pattern("Builder", "Prototype"));
    write(root, "Creational/Prototype.md", &pattern("Prototype", "Builder"));
    write(
        root,
        "Structural/Adapter.md",
        "# Adapter\n## Definition\n## Structure\n```rust\nstruct Adapter;\n```\n## Pros & Cons\n\
         Compare [Builder](../Creational/Builder.md#structure).\n",
    );

    assert_eq!(run_validate(&args(root)).unwrap(), 0);

    let run = validate_root(root, &CatalogConfig::default()).unwrap();
    assert!(run.report.is_empty(), "unexpected findings:\n{}", run.report);
    assert_eq!(run.index.categories.len(), 2);
    let creational: Vec<&str> = run
        .index
        .entries(Category::Creational)
        .iter()
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(creational, vec!["Builder", "Prototype"]);
    assert_eq!(run.links.references.len(), 5);

    let text = render(&run, OutputFormat::Text, true).unwrap();
    assert!(text.starts_with(
        "Creational\n  Builder  Creational/Builder.md\n  Prototype  Creational/Prototype.md\n\
         Structural\n  Adapter  Structural/Adapter.md\n"
    ));
}

#[test]
fn broken_link_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "Creational/Builder.md", &pattern("Builder", "NoSuchPattern"));

    assert_eq!(run_validate(&args(root)).unwrap(), 1);

    let run = validate_root(root, &CatalogConfig::default()).unwrap();
    let text = render(&run, OutputFormat::Text, false).unwrap();
    assert!(text.contains(
        "ERROR Creational/Builder.md: unresolved link 'NoSuchPattern.md#definition' (line 5): \
         no document at Creational/NoSuchPattern.md [unresolved-link]"
    ));
    assert!(text.contains("FAIL: 1 document(s)"));
}

#[test]
fn rendering_is_stable_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "Creational/Builder.md", &pattern("Builder", "Prototype"));
    write(root, "Behavioral/Observer.md", "# Observer\n## Definition\n");

    let render_once = || {
        let run = validate_root(root, &CatalogConfig::default()).unwrap();
        (
            render(&run, OutputFormat::Text, false).unwrap(),
            render(&run, OutputFormat::Json, false).unwrap(),
        )
    };
    assert_eq!(render_once(), render_once());
}
