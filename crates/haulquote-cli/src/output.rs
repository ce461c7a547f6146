//! Output formatting module

use haulquote_app::app::EndpointResponse;
use haulquote_domain::{format_volume, Quote};
use haulquote_types::{EstimateResponse, OutputFormat, Result};

pub fn output_estimate(output_format: OutputFormat, response: &EndpointResponse) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(&response.body)?;
        println!("{}", content);
        return Ok(());
    }

    let body = &response.body;

    println!("\nEstimate Result");
    println!("===============");
    println!("HTTP status:     {}", response.status_code);
    println!("Status:          {}", body.status.label());
    if let Some(reason) = body.reason {
        println!("Reason:          {}", reason.label());
    }

    if body.has_price() {
        print_priced(body);
    } else {
        print_manual_quote(body);
    }

    Ok(())
}

fn print_priced(body: &EstimateResponse) {
    if let Some(ref volume) = body.volume {
        println!("Volume:          {}", volume);
    }
    if let Some(ref price) = body.price {
        println!("Price:           {}", price);
    }
    if let Some(ref load_size) = body.load_size {
        println!("Load size:       {}", load_size);
    }

    if let Some(ref reasoning) = body.reasoning {
        println!("\nReasoning:");
        println!("{}", reasoning);
    }
}

fn print_manual_quote(body: &EstimateResponse) {
    if let Some([primary, secondary]) = body.volumes {
        println!("\n--- Model Volumes ---");
        println!("Primary:         {:.2} yd³", primary);
        println!("Secondary:       {:.2} yd³", secondary);
        if let Some(diff) = body.percent_diff {
            println!("Difference:      {:.1}%", diff * 100.0);
        }
        println!("---------------------");
    }

    if let Some(ref message) = body.message {
        println!("\n{}", message);
    }

    if body.manual_review {
        println!("\nNo automatic price. Send the photos for a manual quote.");
    }
}

pub fn output_quote(output_format: OutputFormat, quote: &Quote) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(&serde_json::json!({
            "volume": format_volume(quote.volume),
            "price": quote.price_range,
            "loadSize": quote.load_size.label(),
        }))?;
        println!("{}", content);
    } else {
        println!("\nQuote");
        println!("=====");
        println!("Volume:          {}", format_volume(quote.volume));
        println!("Price:           {}", quote.price_range);
        println!("Load size:       {}", quote.load_size);
    }

    Ok(())
}
