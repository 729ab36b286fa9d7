//! Scans against a real Chrome. Run with `cargo test -- --ignored` on a
//! machine with Chrome installed.

use form_discovery::{Document, FieldCollector, FieldType, FormBrowser, ScanConfig};

const APPLICATION: &str = r#"
<html><body>
  <form>
    <div class="field">
      <label for="first_name">First Name *</label>
      <input type="text" id="first_name" name="first_name" required>
    </div>
    <div class="field">
      <label for="degree">Degree</label>
      <select id="degree">
        <option value="">Select...</option>
        <option>Bachelor's</option>
        <option>Master's</option>
      </select>
    </div>
    <fieldset>
      <legend>Shifts</legend>
      <label><input type="checkbox" id="s1"> Morning</label>
      <label><input type="checkbox" id="s2"> Evening</label>
    </fieldset>
    <div class="field">
      <label for="loc">Location</label>
      <div class="shell">
        <div class="select__control">
          <input class="select__input" id="loc" role="combobox" aria-autocomplete="list">
        </div>
      </div>
    </div>
    <div class="g-recaptcha"><textarea id="g-recaptcha-response"></textarea></div>
  </form>
  <script>
    // Mount the menu only while open, like a real combobox widget.
    const control = document.querySelector('.select__control');
    const input = document.getElementById('loc');
    control.addEventListener('mousedown', () => {
      setTimeout(() => {
        if (document.querySelector('.select__menu')) return;
        const menu = document.createElement('div');
        menu.className = 'select__menu';
        menu.innerHTML = '<div class="select__menu-list">' +
          '<div class="select__option">Remote</div>' +
          '<div class="select__option">Berlin</div></div>';
        control.parentElement.appendChild(menu);
      }, 250);
    });
    input.addEventListener('keydown', (e) => {
      if (e.key === 'Escape') {
        const menu = document.querySelector('.select__menu');
        if (menu) menu.remove();
      }
    });
  </script>
</body></html>
"#;

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn test_scan_live_page() {
    let browser = FormBrowser::builder()
        .headless(true)
        .build()
        .await
        .expect("Failed to launch browser");

    let page = browser
        .page_from_html(APPLICATION)
        .await
        .expect("Failed to open page");

    let fields = FieldCollector::new(&page)
        .collect_all_form_fields()
        .await
        .expect("Failed to scan");

    let summary: Vec<_> = fields
        .iter()
        .map(|f| (f.label.as_str(), f.field_type))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("First Name", FieldType::Text),
            ("Degree", FieldType::Select),
            ("Shifts", FieldType::Checkbox),
            ("Location", FieldType::ReactSelect),
        ]
    );
    assert!(fields[0].is_required);
    assert_eq!(
        fields[1].options,
        Some(vec!["Bachelor's".to_string(), "Master's".to_string()])
    );
    assert_eq!(
        fields[2].options,
        Some(vec!["Morning".to_string(), "Evening".to_string()])
    );
    assert_eq!(
        fields[3].options,
        Some(vec!["Remote".to_string(), "Berlin".to_string()])
    );

    // The widget was closed again.
    let menus = page.query_all(".select__menu").await.expect("Failed to query");
    assert!(menus.is_empty());
}

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn test_slow_menu_is_given_up_on() {
    let browser = FormBrowser::builder()
        .headless(true)
        .build()
        .await
        .expect("Failed to launch browser");

    let page = browser
        .page_from_html(APPLICATION)
        .await
        .expect("Failed to open page");

    // A 250ms render never fits into a single 50ms poll.
    let config = ScanConfig::builder()
        .poll(1, std::time::Duration::from_millis(50))
        .build();
    let fields = FieldCollector::with_config(&page, config)
        .collect_all_form_fields()
        .await
        .expect("Failed to scan");

    let location = fields
        .iter()
        .find(|f| f.label == "Location")
        .expect("Location field missing");
    assert_eq!(location.options, None);
}

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn test_page_title_and_registry_handles() {
    let browser = FormBrowser::builder()
        .headless(true)
        .build()
        .await
        .expect("Failed to launch browser");

    let page = browser
        .page_from_html("<html><head><title>Apply</title></head><body><input id=x></body></html>")
        .await
        .expect("Failed to open page");

    let title = page.title().await.expect("Failed to get title");
    assert_eq!(title, "Apply");

    let first = page.query_all("#x").await.expect("Failed to query");
    let second = page.query_all("input").await.expect("Failed to query");
    assert_eq!(first, second, "the same element keeps its handle");
    let info = page.describe(first[0]).await.expect("Failed to describe");
    assert_eq!(info.tag, "input");
    assert_eq!(info.attr("id"), Some("x"));
}

#[tokio::test]
#[ignore = "requires a local Chrome installation"]
async fn test_registry_drops_detached_nodes() {
    let browser = FormBrowser::builder()
        .headless(true)
        .build()
        .await
        .expect("Failed to launch browser");

    let page = browser
        .page_from_html(r#"<html><body><div id="menu-host"></div></body></html>"#)
        .await
        .expect("Failed to open page");

    // Remount a 200-option menu three times, querying it each time.
    let remount = r#"
        (() => {
            const host = document.getElementById('menu-host');
            host.innerHTML = '';
            for (let i = 0; i < 200; i++) {
                const option = document.createElement('div');
                option.className = 'option';
                host.appendChild(option);
            }
            return true;
        })()
    "#;
    for _ in 0..3 {
        page.inner().evaluate(remount).await.expect("Failed to remount");
        let options = page.query_all(".option").await.expect("Failed to query");
        assert_eq!(options.len(), 200);
    }

    let tracked = page.registered_nodes().await.expect("Failed to read registry");
    assert!(tracked <= 256, "registry kept {tracked} nodes");

    let current = page.query_all(".option").await.expect("Failed to query");
    let info = page.describe(current[0]).await.expect("Failed to describe");
    assert_eq!(info.attr("class"), Some("option"));
}
