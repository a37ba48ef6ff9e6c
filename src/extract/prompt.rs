/// Fixed instruction template for LogCard field extraction.
///
/// The schema skeleton and the field glossary mirror the layout of the
/// physical cards: parts 1-6 (identification, contract, warranty, special
/// information, successive positions, modifications) on the front page,
/// part 7 (servicing and maintenance operations) on the back.
pub const EXTRACTION_INSTRUCTIONS: &str = r#"You are an expert analyst of aeronautical technical documents. Analyze this complete LogCard (parts 1-7 spread over 2 consecutive pages) and extract ALL of the requested information.

LOGCARD STRUCTURE:
- Page N: parts 1-6 (equipment identification, contract, warranty, special information, successive positions, modifications)
- Page N+1: part 7 (servicing and maintenance operations)

EXTRACT the following data as STRICT JSON:

{
  "logCard": [LogCard number],
  "pageNumbers": [numbers of the analyzed pages],
  "logCardData": {
    "ATA": "[ATA chapter, usually a number such as 22, 23, ...]",
    "Name": "[part/equipment name, e.g. VERIN SEMA, SEMA ACTUATOR; comes from the Name property]",
    "Manufacturer_PN": "[manufacturer part number, e.g. 261087183-8002; comes from the Manufacturer's Part number property]",
    "SN": "[serial number, e.g. 1202, 1223; comes from the Serial Number property]",
    "install_Date_AC": "[installation date on the aircraft, DD/MM/YYYY; found in lines like AH |XX/XX/XXXX | R 160 -B 1054 |  |  | 0H |  | 0H | ]",
    "TSN_AC": "[Time Since New Aircraft, HH:MM format, usually 00:00 for a new aircraft]",
    "CSN_AC": "[Cycle Since New Aircraft, integer, usually 0 for a new aircraft]",
    "TSN_Part": "[Time Since New Part, HH:MM format, may differ from 00:00]",
    "CSN_Part": "[Cycle Since New Part, integer]",
    "Inventory_lifed_components": [true/false - look for the YES/NO checkbox in section 4; comes from the Inventory of lifed components property]
  }
}

CRITICAL INSTRUCTIONS:
1. Look for the information across ALL parts (1-7) spread over the 2 pages
2. Dates are usually in DD/MM/YYYY format
3. install_Date_AC: take the LATEST installation date visible (the most recent), usually on lines starting with AH DD/MM/YYYY (tolerate spacing and noise)
4. TSN_Part: on that latest installation line, take the value of the "Hours / Heures" -> "Total" column (hours of the part) and convert to HH:MM (0H -> "00:00")
5. CSN_Part: on the SAME line, take the "Cycles / Cycles" -> "Total" column (cycles of the part)
6. Inventory_lifed_components: read ONLY the checked box in section 4 (YES/NO). Handle X, checkmark and similar marks. YES checked -> true, NO checked -> false, ambiguous -> null
7. Use null for values that cannot be found
8. Be precise when extracting serial numbers and part numbers

ANSWER WITH VALID JSON ONLY."#;

/// Assembles the per-record prompt: instructions followed by the rendered
/// segment content with its page span.
pub fn build_prompt(
    record_number: usize,
    start_page: usize,
    end_page: usize,
    layout_text: &str,
) -> String {
    format!(
        "{EXTRACTION_INSTRUCTIONS}\n\nCONTENT OF LOGCARD {record_number} TO ANALYZE \
         (PAGES {start_page}-{end_page}):\n\n{layout_text}\n"
    )
}
