use std::fmt::Write;

use shared_utils::html::{display_instant, escape_html, page};

use crate::models::Species;
use crate::screen::{BookingScreen, Dashboard};

pub fn render_page(screen: &BookingScreen, notice: Option<&str>) -> String {
    let body = match screen {
        BookingScreen::Login => "<h1>Login</h1>\n".to_string(),
        BookingScreen::Loading => "<h1>Loading</h1>\n<p>Checking your account&hellip;</p>\n".to_string(),
        BookingScreen::Dashboard(dashboard) => render_dashboard(dashboard, notice),
    };
    page("Vet Clinic Booking", &body)
}

fn render_dashboard(dashboard: &Dashboard, notice: Option<&str>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "<h1 class=\"text-2xl font-bold mb-4\">{}</h1>", escape_html(dashboard.title));
    out.push_str("<form method=\"post\" action=\"/booking/logout\"><button type=\"submit\">Logout</button></form>\n");

    if let Some(message) = notice {
        let _ = writeln!(out, "<p role=\"alert\">{}</p>", escape_html(message));
    }

    if let Some(intake) = &dashboard.intake {
        out.push_str("<form method=\"post\" action=\"/booking/intake\">\n");
        let _ = writeln!(
            out,
            "<div class=\"mb-4\"><label for=\"petName\">Pet's Name</label><input id=\"petName\" name=\"name\" type=\"text\" value=\"{}\" required></div>",
            escape_html(&intake.name)
        );
        out.push_str("<div class=\"mb-4\"><label for=\"species\">Species</label><select id=\"species\" name=\"species\" required>");
        out.push_str("<option value=\"\">Select species</option>");
        for species in Species::ALL {
            let selected = if intake.species == Some(species) { " selected" } else { "" };
            let _ = write!(
                out,
                "<option value=\"{}\"{}>{}</option>",
                species.as_str(), selected, species.label()
            );
        }
        out.push_str("</select></div>\n");
        let _ = writeln!(
            out,
            "<div class=\"mb-4\"><label for=\"breed\">Breed</label><input id=\"breed\" name=\"breed\" type=\"text\" value=\"{}\"></div>",
            escape_html(&intake.breed)
        );
        let _ = writeln!(
            out,
            "<div class=\"mb-4\"><label for=\"reasonForVisit\">Reason for Visit</label><textarea id=\"reasonForVisit\" name=\"reason_for_visit\" rows=\"3\" required>{}</textarea></div>",
            escape_html(&intake.reason_for_visit)
        );
        out.push_str("<button type=\"submit\">Find Available Slots</button>\n</form>\n");
    }

    if let Some(slots) = &dashboard.slots {
        out.push_str("<section class=\"mt-8\">\n<h2 class=\"text-xl font-bold mb-2\">Available Slots</h2>\n");
        for slot in slots {
            let class = if slot.selected { "bg-blue-500" } else { "bg-gray-200" };
            let _ = writeln!(
                out,
                "<form method=\"post\" action=\"/booking/slot\"><input type=\"hidden\" name=\"slot\" value=\"{}\"><button type=\"submit\" class=\"mr-2 mb-2 {}\">{}</button></form>",
                escape_html(&slot.instant.to_rfc3339()), class, escape_html(&slot.label)
            );
        }
        out.push_str("</section>\n");
    }

    if let Some(vets) = &dashboard.vet_picker {
        out.push_str("<form method=\"post\" action=\"/booking/vet\" class=\"mt-4\">\n");
        out.push_str("<label for=\"vetSelect\">Select Veterinarian</label><select id=\"vetSelect\" name=\"vet_id\" required>");
        out.push_str("<option value=\"\">Select a vet</option>");
        for vet in vets {
            let selected = if vet.selected { " selected" } else { "" };
            let _ = write!(
                out,
                "<option value=\"{}\"{}>{}</option>",
                vet.id, selected, escape_html(&vet.name)
            );
        }
        out.push_str("</select><button type=\"submit\">Choose</button>\n</form>\n");
    }

    if dashboard.can_book {
        out.push_str("<form method=\"post\" action=\"/booking/book\" class=\"mt-4\"><button type=\"submit\">Book Appointment</button></form>\n");
    }

    out.push_str("<section class=\"mt-8\">\n<h2 class=\"text-xl font-bold mb-2\">Previous Treatments</h2>\n");
    for treatment in &dashboard.treatments {
        out.push_str("<div class=\"mb-4 p-4 border rounded\">\n");
        let _ = writeln!(out, "<p><strong>Date:</strong> {}</p>", display_instant(&treatment.date));
        let _ = writeln!(
            out,
            "<p><strong>Pet:</strong> {}</p>",
            escape_html(treatment.pet_name.as_deref().unwrap_or("Unknown"))
        );
        if let Some(appointment) = &treatment.appointment_datetime {
            let _ = writeln!(out, "<p><strong>Appointment:</strong> {}</p>", display_instant(appointment));
        }
        let _ = writeln!(
            out,
            "<p><strong>Description:</strong> {}</p>",
            escape_html(treatment.description.as_deref().unwrap_or(""))
        );
        let _ = writeln!(
            out,
            "<p><strong>Notes:</strong> {}</p>",
            escape_html(treatment.notes.as_deref().unwrap_or(""))
        );
        out.push_str("</div>\n");
    }
    out.push_str("</section>\n");

    if dashboard.admin_panel {
        out.push_str("<section class=\"mt-8\">\n<h2 class=\"text-xl font-bold mb-2\">Admin Functions</h2>\n</section>\n");
    }

    out
}
