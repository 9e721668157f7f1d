// ABOUTME: Integration tests for document queries through the public API.
// ABOUTME: Covers preprocessing, predicates, nesting, limits, title lookup and fail-soft scanning.

use peasoup::{Document, FragmentError, FragmentParser, Predicate, RawFragmentParser, Regex};
use pretty_assertions::assert_eq;

fn raw(html: &str) -> Document<RawFragmentParser> {
    Document::builder().parser(RawFragmentParser).build(html)
}

mod preprocessing_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_non_html_input_returns_nothing() {
        let doc = Document::new("<div><p>plain</p></div>");
        for name in ["div", "p", "title", "a"] {
            assert!(doc.find_all(name, &Predicate::new(), None).is_empty());
        }
        assert!(doc.find("p", &Predicate::new()).is_none());
    }

    #[test]
    fn test_commented_tags_are_invisible() {
        let doc = raw("<html><!-- <a href=\"x\">hidden</a> --><a href=\"y\">shown</a></html>");
        assert_eq!(
            doc.find_all("a", &Predicate::new(), None),
            vec![r#"<a href="y">shown</a>"#]
        );
    }

    #[test]
    fn test_script_bodies_are_invisible() {
        let doc = raw(concat!(
            "<html><body>",
            "<script type=\"text/javascript\">document.write('<p>fake</p>');</script>",
            "<p>real</p>",
            "</body></html>"
        ));
        assert_eq!(doc.find_all("p", &Predicate::new(), None), vec!["<p>real</p>"]);
    }

    #[test]
    fn test_uppercase_marker_is_html() {
        let doc = Document::new("<HTML><P>x</P></HTML>");
        assert!(doc.is_html());
        assert_eq!(doc.find_all("p", &Predicate::new(), None).len(), 1);
    }
}

mod predicate_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LINKS: &str = concat!(
        "<html><body>",
        "<a href=\"http://x\">exact</a>",
        "<a href=\"http://x/more\">longer</a>",
        "<a href='https://y'>secure</a>",
        "<a href=/relative>relative</a>",
        "<a name=\"anchor\">no href</a>",
        "</body></html>"
    );

    #[test]
    fn test_literal_href() {
        let doc = Document::new(LINKS);
        let found = doc.find_all("a", &Predicate::new().with("href", "http://x"), None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text(), "exact");
    }

    #[test]
    fn test_pattern_href() {
        let doc = Document::new(LINKS);
        let pred = Predicate::new().with("href", Regex::new("^http").unwrap());
        let texts: Vec<String> = doc
            .find_all("a", &pred, None)
            .iter()
            .map(|el| el.text())
            .collect();
        assert_eq!(texts, vec!["exact", "longer", "secure"]);
    }

    #[test]
    fn test_pattern_matches_inside_value() {
        let doc = Document::new(LINKS);
        let pred = Predicate::new().with("href", Regex::new("rel").unwrap());
        let found = doc.find_all("a", &pred, None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attr("href"), Some("/relative"));
    }

    #[test]
    fn test_class_filter_example() {
        let doc = Document::new(
            r#"<html><body><p class="a">One</p><p class="b">Two</p></body></html>"#,
        );
        let found = doc.find_all("p", &Predicate::new().with("class", "b"), None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text(), "Two");
        assert_eq!(found[0].name(), "p");
    }

    #[test]
    fn test_duplicate_attribute_last_wins() {
        let doc = raw(r#"<html><p class="a" class="b">x</p></html>"#);
        assert_eq!(
            doc.find_all("p", &Predicate::new().with("class", "b"), None).len(),
            1
        );
        assert!(doc
            .find_all("p", &Predicate::new().with("class", "a"), None)
            .is_empty());
    }

    #[test]
    fn test_named_overrides_positional() {
        let doc = raw(r#"<html><p class="a">A</p><p class="b">B</p></html>"#);
        let found = doc
            .query("p")
            .attrs(Predicate::new().with("class", "a"))
            .attr("class", "b")
            .all();
        assert_eq!(found, vec![r#"<p class="b">B</p>"#]);
    }

    #[test]
    fn test_tags_without_values_do_not_match() {
        // Open tags are only recognised when every attribute has a value
        let doc = raw("<html><input disabled><input type=text></html>");
        assert_eq!(
            doc.find_all("input", &Predicate::new(), None),
            vec!["<input type=text>"]
        );
    }
}

mod boundary_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_self_closing_fragment() {
        let doc = raw("<html><br/>text</br></html>");
        assert_eq!(doc.find_all("br", &Predicate::new(), None), vec!["<br/>"]);
    }

    #[test]
    fn test_nested_same_name() {
        let doc = Document::new("<html><div><div>inner</div></div></html>");
        let found = doc.find_all("div", &Predicate::new(), None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fragment(), "<div><div>inner</div></div>");
        assert_eq!(found[0].children().count(), 1);
    }

    #[test]
    fn test_unresolved_nesting_keeps_open_tag() {
        let doc = raw("<html><ul><li>one<li>two</ul></html>");
        assert_eq!(
            doc.find_all("li", &Predicate::new(), None),
            vec!["<li>", "<li>"]
        );
    }

    #[test]
    fn test_case_insensitive_tags() {
        let doc = raw("<html><DIV Class=x>a</div></html>");
        assert_eq!(
            doc.find_all("div", &Predicate::new().with("Class", "x"), None),
            vec!["<DIV Class=x>a</div>"]
        );
    }
}

mod limit_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_limit_in_document_order() {
        let doc = raw("<html><p>1</p><p>2</p><p>3</p></html>");
        assert_eq!(
            doc.find_all("p", &Predicate::new(), Some(2)),
            vec!["<p>1</p>", "<p>2</p>"]
        );
        assert_eq!(doc.query("p").limit(5).all().len(), 3);
    }

    #[test]
    fn test_limit_halts_scanning() {
        struct Counting(std::cell::Cell<usize>);

        impl FragmentParser for Counting {
            type Element = String;

            fn parse_fragment(&self, fragment: &str) -> Result<String, FragmentError> {
                self.0.set(self.0.get() + 1);
                Ok(fragment.to_string())
            }
        }

        let doc = Document::builder()
            .parser(Counting(std::cell::Cell::new(0)))
            .build("<html><p>1</p><p>2</p><p>3</p></html>");
        assert_eq!(doc.find_all("p", &Predicate::new(), Some(1)).len(), 1);
        assert_eq!(doc.parser().0.get(), 1);
    }

    #[test]
    fn test_find_returns_first() {
        let doc = Document::new("<html><p>1</p><p>2</p></html>");
        assert_eq!(doc.find("p", &Predicate::new()).map(|el| el.text()), Some("1".to_string()));
        assert!(doc.find("table", &Predicate::new()).is_none());
    }
}

mod title_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_present() {
        let doc = Document::new("<html><head><title>Hello\nWorld</title></head></html>");
        let title = doc.title().unwrap();
        assert_eq!(title.name(), "title");
        assert_eq!(title.text(), "Hello\nWorld");
    }

    #[test]
    fn test_title_absent() {
        let doc = Document::new("<html><head></head><body>x</body></html>");
        assert!(doc.title().is_none());
    }

    #[test]
    fn test_title_on_non_html() {
        assert!(Document::new("<title>x</title>").title().is_none());
    }
}

mod failure_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_parts_are_found() {
        let doc = Document::new(
            r#"<html><body><table><tr id="r1"><td class="x">cell</td><td>two</td></tr></table></body></html>"#,
        );
        let tds = doc.find_all("td", &Predicate::new(), None);
        assert_eq!(tds.len(), 2);
        assert_eq!(tds[0].attr("class"), Some("x"));
        assert_eq!(tds[0].text(), "cell");
        assert_eq!(tds[1].text(), "two");

        let tr = doc.find("tr", &Predicate::new()).unwrap();
        assert_eq!(tr.attr("id"), Some("r1"));
        assert_eq!(tr.text(), "celltwo");

        let outcome = doc.scan("td", &Predicate::new().with("class", "x"), None);
        assert!(outcome.is_complete());
        assert_eq!(outcome.elements.len(), 1);
    }

    #[test]
    fn test_html_parser_failure_is_soft() {
        // <image> is renamed to <img> by the parser, so no element matches the name
        let doc = Document::new("<html><p>a</p><image src=x><image src=y></html>");
        assert!(doc.find_all("image", &Predicate::new(), None).is_empty());

        let outcome = doc.scan("image", &Predicate::new(), None);
        assert!(outcome.elements.is_empty());
        assert!(outcome.error.unwrap().is_fragment());
        assert_eq!(doc.fragments("image", &Predicate::new(), None).len(), 2);
    }

    #[test]
    fn test_document_level_tags() {
        let doc = Document::new(r#"<html lang="en"><body class="main"><p>x</p></body></html>"#);
        let body = doc.find("body", &Predicate::new()).unwrap();
        assert_eq!(body.attr("class"), Some("main"));
        let html = doc.find("html", &Predicate::new()).unwrap();
        assert_eq!(html.attr("lang"), Some("en"));
    }
}
