use crate::routes::RoutePath;

use super::markup::Element;

/// Side navigation; the icon for `active` carries `active-icon`.
pub fn vertical_layout(active: RoutePath) -> Element {
    let icon = |id: &'static str, test_id: &'static str, label: &'static str, route: RoutePath| {
        let class = if route == active {
            "layout-icon active-icon"
        } else {
            "layout-icon"
        };
        Element::new("div")
            .id(id)
            .class(class)
            .test_id(test_id)
            .attr("data-route", route.as_str())
            .text(label)
    };

    Element::new("div")
        .class("vertical-navbar")
        .child(Element::new("div").class("layout-title").text("Billed"))
        .child(icon("layout-icon1", "icon-window", "Mes notes de frais", RoutePath::Bills))
        .child(icon("layout-icon2", "icon-mail", "Nouvelle note de frais", RoutePath::NewBill))
}

/// Full page shell around `content`.
pub fn page(active: RoutePath, content: Element) -> Element {
    Element::new("div")
        .id("root")
        .child(
            Element::new("div")
                .class("layout")
                .child(vertical_layout(active))
                .child(content),
        )
}
