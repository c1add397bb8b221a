use htree::*;

fn main() -> Result<(), HtreeError> {
    // 1. Parse the static segments once
    let template = Template::new(&[
        "\n  <div class=\"card ",
        "\" ...",
        ">\n    <h2>",
        "</h2>\n    <!-- body -->\n    <p>Hello, <b>",
        "</b>!</p>\n    <br/>\n  </div>\n",
    ]);
    println!("Instruction stream: {:#?}", template.block());

    // 2. Build a node tree with one set of values
    let built = template.build(&["active", "{ id: 1 }", "Title", "world"])?;
    println!("Node tree: {:#?}", built);

    // 3. Build again with different values, this time straight to markup
    let mut render = from_fn(
        |tag: Tag<&str>,
         _props: Vec<PropSource<&str>>,
         children: Vec<Child<&str, String>>|
         -> String {
            let tag = tag.as_name().unwrap_or("").to_string();
            let inner: String = children
                .into_iter()
                .map(|c| match c {
                    Child::Text(t) => t,
                    Child::Dynamic(d) => d.to_string(),
                    Child::Element(e) => e,
                })
                .collect();
            format!("<{tag}>{inner}</{tag}>")
        },
    );
    let markup = template.build_with(&["idle", "{}", "Other", "there"], &mut render)?;
    match markup {
        Built::Single(Child::Element(html)) => println!("Rendered: {}", html),
        other => println!("Unexpected shape: {:?}", other),
    }
    Ok(())
}
