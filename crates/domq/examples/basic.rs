//! Example: Basic usage of domq

use domq::{Dom, DomConfig, Handler, Input};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let html = r#"<html><body>
        <ul id="todo"><li>write</li><li>review</li></ul>
        <button id="add">add</button>
    </body></html>"#;

    let dom = match Dom::parse(html, DomConfig::default()) {
        Ok(dom) => dom,
        Err(err) => {
            eprintln!("failed to parse page: {err}");
            return;
        }
    };

    println!("domq v{}", domq::VERSION);

    dom.select(Input::ready(|dom| {
        println!("ready with {} items", dom.select("#todo li").len());
    }));

    let add = Handler::new(|dom, _| {
        dom.select("#todo").append("<li>ship</li>");
    });
    dom.select("#add").on("click", &add);

    dom.content_loaded();
    dom.select("#add").trigger("click");

    dom.select("#todo li").add_class("item").each(|node, index| {
        println!("{index}: {node}");
    });
    println!("{}", dom.select("#todo").html().unwrap_or_default());
}
