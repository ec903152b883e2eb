use crate::domain::service::{OUT_OF_STOCK_MESSAGE, PAYMENT_FAILED_MESSAGE, ReplyStatus};
use crate::error::Result;
use std::fmt::Write;

pub const PROCESS_NAME: &str = "OrderProcessing";
pub const TARGET_NAMESPACE: &str = "http://example.com/orderprocess";
const BPEL_NAMESPACE: &str = "http://docs.oasis-open.org/wsbpel/2.0/process/executable";
const CLIENT_NAMESPACE: &str = "http://client.example.com";

const INDENT: &str = "  ";

/// Confirmation text of the exported process. The runner's own reply uses
/// the shorter `CONFIRMED_MESSAGE`.
pub const EXPORT_CONFIRMED_MESSAGE: &str = "Order confirmed successfully";

/// Export the order process as a WS-BPEL 2.0 executable process document.
///
/// The document mirrors what the runner does: receive, authorize, branch on
/// the authorization, reserve, branch on the reservation with a refund as
/// compensation, and a single reply carrying one of three responses.
pub fn process_document() -> Result<String> {
    let mut xml = String::new();

    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(xml, r#"<process name="{PROCESS_NAME}""#)?;
    writeln!(xml, r#"         targetNamespace="{TARGET_NAMESPACE}""#)?;
    writeln!(xml, r#"         xmlns="{BPEL_NAMESPACE}""#)?;
    writeln!(xml, r#"         xmlns:tns="{TARGET_NAMESPACE}""#)?;
    writeln!(xml, r#"         xmlns:client="{CLIENT_NAMESPACE}">"#)?;
    writeln!(xml)?;

    // ── Variables ──
    line(&mut xml, 1, "<!-- Process state -->")?;
    line(&mut xml, 1, "<variables>")?;
    for (name, message_type) in [
        ("orderRequest", "client:OrderRequest"),
        ("paymentResponse", "client:PaymentResponse"),
        ("inventoryResponse", "client:InventoryResponse"),
        ("orderResponse", "client:OrderResponse"),
    ] {
        line(
            &mut xml,
            2,
            &format!(r#"<variable name="{name}" messageType="{message_type}"/>"#),
        )?;
    }
    line(&mut xml, 1, "</variables>")?;
    writeln!(xml)?;

    // ── Main sequence ──
    line(&mut xml, 1, "<sequence>")?;
    line(&mut xml, 2, "<!-- 1. Receive the client request -->")?;
    line(
        &mut xml,
        2,
        r#"<receive name="ReceiveOrder" partnerLink="ClientLink" operation="processOrder" variable="orderRequest"/>"#,
    )?;
    writeln!(xml)?;

    line(&mut xml, 2, "<!-- 2. Authorize payment -->")?;
    invoke(
        &mut xml,
        2,
        "AuthorizePayment",
        "PaymentLink",
        "authorizePayment",
        "orderRequest",
        Some("paymentResponse"),
    )?;
    writeln!(xml)?;

    line(&mut xml, 2, "<!-- 3. Branch on the payment result -->")?;
    line(&mut xml, 2, r#"<if name="CheckPaymentApproval">"#)?;
    line(&mut xml, 3, "<condition>$paymentResponse.approved = 'true'</condition>")?;
    line(&mut xml, 3, "<sequence>")?;
    line(&mut xml, 4, "<!-- 4. Reserve inventory -->")?;
    invoke(
        &mut xml,
        4,
        "ReserveInventory",
        "InventoryLink",
        "reserveItems",
        "orderRequest",
        Some("inventoryResponse"),
    )?;
    line(&mut xml, 4, r#"<if name="CheckInventoryAvailability">"#)?;
    line(&mut xml, 5, "<condition>$inventoryResponse.available = 'true'</condition>")?;
    assign(
        &mut xml,
        5,
        "SetConfirmationResponse",
        ReplyStatus::Confirmed,
        EXPORT_CONFIRMED_MESSAGE,
    )?;
    line(&mut xml, 5, "<else>")?;
    line(&mut xml, 6, "<!-- Out of stock: undo the authorization -->")?;
    line(&mut xml, 6, "<compensationHandler>")?;
    invoke(
        &mut xml,
        7,
        "RefundPayment",
        "PaymentLink",
        "refundPayment",
        "paymentResponse",
        None,
    )?;
    line(&mut xml, 6, "</compensationHandler>")?;
    assign(
        &mut xml,
        6,
        "SetRejectionResponse",
        ReplyStatus::Rejected,
        OUT_OF_STOCK_MESSAGE,
    )?;
    line(&mut xml, 5, "</else>")?;
    line(&mut xml, 4, "</if>")?;
    line(&mut xml, 3, "</sequence>")?;
    line(&mut xml, 3, "<else>")?;
    assign(
        &mut xml,
        4,
        "SetPaymentRejectionResponse",
        ReplyStatus::Rejected,
        PAYMENT_FAILED_MESSAGE,
    )?;
    line(&mut xml, 3, "</else>")?;
    line(&mut xml, 2, "</if>")?;
    writeln!(xml)?;

    line(&mut xml, 2, "<!-- 5. Send the final response -->")?;
    line(
        &mut xml,
        2,
        r#"<reply name="SendResponse" partnerLink="ClientLink" operation="processOrder" variable="orderResponse"/>"#,
    )?;
    line(&mut xml, 1, "</sequence>")?;
    writeln!(xml, "</process>")?;

    Ok(xml)
}

fn line(xml: &mut String, depth: usize, content: &str) -> std::fmt::Result {
    writeln!(xml, "{}{}", INDENT.repeat(depth), content)
}

fn invoke(
    xml: &mut String,
    depth: usize,
    name: &str,
    partner_link: &str,
    operation: &str,
    input: &str,
    output: Option<&str>,
) -> std::fmt::Result {
    let output = output
        .map(|o| format!(r#" outputVariable="{o}""#))
        .unwrap_or_default();
    line(
        xml,
        depth,
        &format!(
            r#"<invoke name="{name}" partnerLink="{partner_link}" operation="{operation}" inputVariable="{input}"{output}/>"#
        ),
    )
}

fn assign(
    xml: &mut String,
    depth: usize,
    name: &str,
    status: ReplyStatus,
    message: &str,
) -> std::fmt::Result {
    line(xml, depth, &format!(r#"<assign name="{name}">"#))?;
    for (literal, target) in [
        (status.as_str(), "$orderResponse.status"),
        (message, "$orderResponse.message"),
    ] {
        line(xml, depth + 1, "<copy>")?;
        line(
            xml,
            depth + 2,
            &format!(r#"<from literal="{}"/>"#, escape_attr(literal)),
        )?;
        line(xml, depth + 2, &format!("<to>{target}</to>"))?;
        line(xml, depth + 1, "</copy>")?;
    }
    line(xml, depth, "</assign>")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
