use crate::{
    new_bill::{NewBillForm, EXPENSE_TYPES},
    routes::RoutePath,
};

use super::{layout::page, markup::Element};

fn labelled(label: &str, field: Element) -> Element {
    Element::new("div")
        .class("form-group")
        .child(Element::new("label").class("bold-label").text(label))
        .child(field)
}

fn input(input_type: &'static str, test_id: &'static str, value: &str) -> Element {
    Element::new("input")
        .attr("type", input_type)
        .class("form-control blue-border")
        .test_id(test_id)
        .attr("value", value)
}

pub fn render(form: &NewBillForm) -> Element {
    let expense_type = Element::new("select")
        .attr("required", "")
        .class("form-control blue-border")
        .test_id("expense-type")
        .children(EXPENSE_TYPES.iter().map(|option| {
            Element::new("option")
                .attr_if(form.expense_type == *option, "selected", "")
                .text(*option)
        }));

    let file_name = form
        .file
        .as_ref()
        .map(|file| file.file_name().to_string())
        .unwrap_or_default();

    let left = Element::new("div")
        .class("col-md-6")
        .child(labelled("Type de dépense", expense_type))
        .child(labelled(
            "Nom de la dépense",
            input("text", "expense-name", &form.name).attr("placeholder", "Vol Paris Londres"),
        ))
        .child(labelled(
            "Date",
            input("date", "datepicker", &form.date).attr("required", ""),
        ))
        .child(labelled(
            "Montant TTC",
            input("number", "amount", &form.amount)
                .attr("placeholder", "348")
                .attr("required", ""),
        ))
        .child(
            Element::new("div")
                .class("col-half-row")
                .child(labelled(
                    "TVA",
                    input("number", "vat", &form.vat).attr("placeholder", "70"),
                ))
                .child(labelled(
                    "%",
                    input("number", "pct", &form.pct)
                        .attr("placeholder", "20")
                        .attr("required", ""),
                )),
        );

    let right = Element::new("div")
        .class("col-md-6")
        .child(labelled(
            "Commentaire",
            Element::new("textarea")
                .class("form-control blue-border")
                .test_id("commentary")
                .attr("rows", "3")
                .text(form.commentary.clone()),
        ))
        .child(labelled(
            "Justificatif",
            Element::new("input")
                .attr("required", "")
                .attr("type", "file")
                .attr("accept", ".jpg,.jpeg,.png")
                .class("form-control blue-border")
                .test_id("file")
                .attr("value", file_name),
        ));

    let submit = Element::new("div").class("col-md-6").child(
        Element::new("button")
            .attr("type", "submit")
            .id("btn-send-bill")
            .class("btn btn-primary")
            .text("Envoyer"),
    );

    let content = Element::new("div")
        .class("content")
        .child(
            Element::new("div")
                .class("content-header")
                .child(
                    Element::new("div")
                        .class("content-title")
                        .text("Envoyer une note de frais"),
                ),
        )
        .child(
            Element::new("div").class("form-newbill-container content-inner").child(
                Element::new("form")
                    .test_id("form-new-bill")
                    .child(Element::new("div").class("row").child(left).child(right))
                    .child(Element::new("div").class("row").child(submit)),
            ),
        );

    page(RoutePath::NewBill, content)
}
