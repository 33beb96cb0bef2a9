//! Server-rendered HTML for the subscription and confirmation pages.

use common::{CURRENCY, PlanTable, Transaction};

/// Route the QR directory is served under.
pub const QR_CODE_ROUTE: &str = "/static/qrcodes";

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

pub fn subscription_page(plans: &PlanTable) -> String {
    let options: String = plans
        .iter()
        .map(|plan| {
            format!(
                r#"    <li><label><input type="radio" name="plan" value="{name}" data-amount="{price}"> {name}: {price} {currency}</label></li>
"#,
                name = escape(&plan.name),
                price = plan.price,
                currency = CURRENCY
            )
        })
        .collect();

    let body = format!(
        r#"<h1>Choose your plan</h1>
<form id="subscribe">
  <ul class="plans">
{options}  </ul>
  <input name="name" placeholder="Name" required>
  <input name="mobile" placeholder="Mobile" required>
  <button type="submit">Pay with UPI</button>
</form>
<p id="error"></p>
<script>
document.getElementById("subscribe").addEventListener("submit", async (event) => {{
  event.preventDefault();
  const form = event.target;
  const plan = form.querySelector("input[name=plan]:checked");
  const response = await fetch("/submit", {{
    method: "POST",
    headers: {{ "Content-Type": "application/json" }},
    body: JSON.stringify({{
      name: form.elements["name"].value,
      mobile: form.elements["mobile"].value,
      plan: plan ? plan.value : "",
      amount: plan ? Number(plan.dataset.amount) : 0
    }})
  }});
  const data = await response.json();
  if (response.ok) {{
    window.location = "/payment_confirmation/" + data.transaction_id;
  }} else {{
    document.getElementById("error").textContent = data.error;
  }}
}});
</script>"#,
        options = options
    );

    layout("Subscription plans", &body)
}

pub fn payment_confirmation_page(transaction: &Transaction, support_telegram: Option<&str>) -> String {
    let support = match support_telegram {
        Some(handle) => format!(
            r#"<p>Questions? Contact <a href="https://t.me/{handle}">@{handle}</a> on Telegram.</p>"#,
            handle = escape(handle)
        ),
        None => String::new(),
    };

    let body = format!(
        r#"<h1>Complete your payment</h1>
<p>Plan: <strong>{plan}</strong></p>
<p>Amount: <strong>{amount} {currency}</strong></p>
<img src="{route}/{qr}" alt="UPI QR code">
<p>Transaction ID: <code>{id}</code></p>
<button id="confirm">I have paid</button>
<p id="status"></p>
{support}
<script>
document.getElementById("confirm").addEventListener("click", async () => {{
  const response = await fetch("/confirm_payment/{id}", {{ method: "POST" }});
  const data = await response.json();
  document.getElementById("status").textContent = data.message || data.error;
}});
</script>"#,
        plan = escape(&transaction.plan),
        amount = transaction.amount,
        currency = CURRENCY,
        route = QR_CODE_ROUTE,
        qr = escape(transaction.qr_code_filename()),
        id = escape(&transaction.transaction_id),
        support = support
    );

    layout("Payment confirmation", &body)
}
