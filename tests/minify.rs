use pretty_assertions::assert_eq;
use squeezehtml::{minify, minify_bytes, minify_with, MinifyOptions};

fn keep_comments() -> MinifyOptions {
    MinifyOptions::builder().preserve_comments(true).build()
}

#[test]
fn paragraph_whitespace_collapses() {
    assert_eq!(minify("<p>  Hello   world  </p>"), "<p>Hello world</p>");
}

#[test]
fn inline_boundaries_keep_one_space() {
    assert_eq!(
        minify("Hello <b> World </b> Test"),
        "Hello <b>World</b> Test"
    );
    assert_eq!(
        minify("see\n\t<a href=\"#x\">this</a>\n  link"),
        "see <a href=\"#x\">this</a> link"
    );
}

#[test]
fn block_boundaries_drop_whitespace() {
    assert_eq!(
        minify("<div>\n  <p>one</p>\n  <p>two</p>\n</div>\n"),
        "<div><p>one</p><p>two</p></div>"
    );
    assert_eq!(minify("text   <div>x</div>   more"), "text<div>x</div>more");
}

#[test]
fn pre_content_is_untouched() {
    let input = "<pre>\n  line1\n  line2\n</pre>";
    assert_eq!(minify(input), input);
}

#[test]
fn preserved_regions_keep_comments_and_tags() {
    let input = "<pre>  <!--  keep  -->  <b  class = x >  y </b>\n</pre>";
    assert_eq!(minify(input), input);

    assert_eq!(
        minify("<div> <style>\n  p { margin: 0 }\n</style> </div>"),
        "<div><style>\n  p { margin: 0 }\n</style></div>"
    );
}

#[test]
fn preserved_names_ignore_case() {
    assert_eq!(
        minify("<PRE>  a  </Pre>  <p> b </p>"),
        "<PRE>  a  </Pre><p>b</p>"
    );
}

#[test]
fn closing_tag_ending_region_is_normalized() {
    assert_eq!(minify("<pre> a </pre  >"), "<pre> a </pre>");
}

#[test]
fn comments_are_stripped() {
    assert_eq!(minify("<!-- note --><p>x</p>"), "<p>x</p>");
    assert_eq!(minify("a <!-- x --> b"), "a b");
    assert_eq!(minify("<p>a<!-- -- > -->b</p>"), "<p>ab</p>");
}

#[test]
fn comments_can_be_kept() {
    assert_eq!(
        minify_with("<!-- note --><p>x</p>", &keep_comments()),
        "<!-- note --><p>x</p>"
    );
    assert_eq!(
        minify_with("a   <!--x-->   b", &keep_comments()),
        "a <!--x--> b"
    );
    assert_eq!(
        minify_with("<p>  <!--x-->  b</p>", &keep_comments()),
        "<p><!--x-->b</p>"
    );
}

#[test]
fn self_closing_gets_one_slash() {
    assert_eq!(minify("<br  />"), "<br/>");
    assert_eq!(minify("<br/>"), "<br/>");
    assert_eq!(minify("<img src=\"a.png\"  / / >"), "<img src=\"a.png\"/>");
}

#[test]
fn attribute_whitespace_collapses_outside_quotes() {
    assert_eq!(
        minify("<div class = \"a   b\" >x</div>"),
        "<div class=\"a   b\">x</div>"
    );
    assert_eq!(
        minify("<a\n   href='x'\n\n   title=\"t  t\">y</a>"),
        "<a href='x' title=\"t  t\">y</a>"
    );
}

#[test]
fn quoted_values_are_untouched_with_either_flag() {
    let keep = MinifyOptions::builder()
        .preserve_attribute_whitespace(true)
        .build();
    for opts in [MinifyOptions::default(), keep] {
        let out = minify_with("<div class = \"a   b\" >x</div>", &opts);
        assert!(out.contains("\"a   b\""), "{out}");
    }
}

#[test]
fn attribute_runs_collapse_with_preserved_attribute_whitespace() {
    let keep = MinifyOptions::builder()
        .preserve_attribute_whitespace(true)
        .build();
    assert_eq!(minify_with("<a  x   y>z</a>", &keep), "<a x y>z</a>");
    assert_eq!(
        minify_with("<div   class=\"a\"    id=\"b\"  >x</div>", &keep),
        "<div class=\"a\" id=\"b\">x</div>"
    );
    assert_eq!(
        minify_with("<div class = \"a   b\" >x</div>", &keep),
        "<div class = \"a   b\">x</div>"
    );
}

#[test]
fn space_survives_around_inline_self_closing_tags() {
    assert_eq!(minify("a <br/> b"), "a <br/> b");
    assert_eq!(minify("x<br/> y"), "x<br/> y");
    assert_eq!(
        minify("<p>one <img src=\"a.png\" /> two</p>"),
        "<p>one <img src=\"a.png\"/> two</p>"
    );
    assert_eq!(minify("a <hr/> b"), "a<hr/>b");
}

#[test]
fn doctype_and_custom_inline_elements() {
    assert_eq!(
        minify("<!DOCTYPE  html>\n<html>\n<body>  x  </body>\n</html>"),
        "<!DOCTYPE html><html><body>x</body></html>"
    );

    let opts = MinifyOptions::builder().add_inline_element("x-chip").build();
    assert_eq!(minify_with("a <x-chip>b</x-chip>", &opts), "a <x-chip>b</x-chip>");
    assert_eq!(minify("a <x-chip>b</x-chip>"), "a<x-chip>b</x-chip>");
}

#[test]
fn non_ascii_text_passes_through() {
    assert_eq!(
        minify("<p>  café\u{a0}\u{a0}naïve  <em>日本</em> </p>"),
        "<p>café\u{a0}\u{a0}naïve <em>日本</em></p>"
    );
}

#[test]
fn leading_and_trailing_whitespace_is_dropped() {
    assert_eq!(minify("  \n hello  \n"), "hello");
    assert_eq!(minify(""), "");
    assert_eq!(minify(" \t\r\n "), "");
}

#[test]
fn bytes_that_are_not_utf8_pass_through() {
    let out = minify_bytes(b"<p>  a\xff\xfe  b </p>", &MinifyOptions::default());
    assert_eq!(out, b"<p>a\xff\xfe b</p>".to_vec());
}
