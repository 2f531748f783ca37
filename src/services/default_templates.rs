/// Stock recredentialing templates inserted into an empty store
pub const DEFAULT_TEMPLATES: [(&str, &str, &str); 6] = [
    (
        "Version 1: Formal & Thorough",
        "Recredentialing Request – Updated Information Needed",
        concat!(
            "Dear [Attorney’s Name],\n",
            "\n",
            "I hope this message finds you well. I’m reaching out on behalf of the Legal Provider Network at Workplace Options as part of our recredentialing efforts for participating attorneys.\n",
            "\n",
            "To help us maintain accurate and up-to-date records, we kindly ask that you confirm or provide the following:\n",
            "- A copy of your current professional liability insurance policy (declarations page is sufficient)\n",
            "- Confirmation of your current contact information (email, phone, mailing address)\n",
            "- Any updates regarding your practice areas or changes in staff involved in client intake and scheduling.\n",
            "\n",
            "Your cooperation helps ensure continuity in referrals and supports our compliance standards. Please reply at your earliest convenience with the requested details, or reach out if you have any questions.",
        ),
    ),
    (
        "Alternate Version 1A: Formal & Thorough",
        "Request for Updated Credentials – Legal Network Profile",
        concat!(
            "Dear [Attorney’s Name],\n",
            "\n",
            "I hope this message finds you in good health and high spirits. I’m contacting you on behalf of the Workplace Options Legal Network as part of our periodic recredentialing process.\n",
            "\n",
            "To ensure your profile remains active and up to date, we kindly ask you to review and share the following:\n",
            "- A valid copy of your current professional liability insurance (declarations page is acceptable)\n",
            "- A confirmation of your preferred contact details (email, phone number, mailing address)\n",
            "- Any recent modifications to your practice areas or changes in staff involved in client scheduling or intake\n",
            "\n",
            "This information allows us to maintain the integrity and reliability of our provider network. Your cooperation is appreciated, and we’re happy to assist with any questions you may have.",
        ),
    ),
    (
        "Version 2: Friendly & Concise",
        "Quick Check-In – Help Us Update Your Profile",
        concat!(
            "Hi [Attorney’s Name],\n",
            "\n",
            "Hope you're doing well! We're currently updating provider profiles for our legal network and just need a few quick items from you:\n",
            "- A copy of your current liability insurance (declarations page is fine)\n",
            "- Confirmation of your preferred contact information\n",
            "- Any updates to your practice focus or support staff you'd like us to know about\n",
            "\n",
            "Feel free to respond directly to this email. Let us know if you have any questions—we’re happy to help.",
        ),
    ),
    (
        "Alternate Version 2A: Friendly & Concise",
        "Just a Quick Update for Your Profile",
        concat!(
            "Hi [Attorney’s Name],\n",
            "\n",
            "I hope all’s going well with you! We’re refreshing our records and wanted to touch base to make sure we have the latest information on your profile.\n",
            "\n",
            "Could you send us:\n",
            "- A current copy of your liability insurance\n",
            "- Your preferred contact information\n",
            "- Any updates to your practice areas or team members who assist with calls or scheduling\n",
            "\n",
            "It’ll only take a moment, and you can reply directly to this email.",
        ),
    ),
    (
        "Version 3: Neutral & Direct",
        "Follow-Up – Recredentialing Information Needed",
        concat!(
            "Dear [Attorney’s Name],\n",
            "\n",
            "We are following up regarding our request for updated information as part of our attorney network recredentialing.\n",
            "\n",
            "To complete your profile review, we kindly need:\n",
            "- A copy of your professional liability insurance policy\n",
            "- Updated contact details\n",
            "- Any changes to your practice areas or staff we should be aware of\n",
            "\n",
            "Please respond at your earliest convenience. If we don’t receive a response after 3 attempts, we may need to temporarily pause referrals until your profile is complete.",
        ),
    ),
    (
        "Alternate Version 3A: Neutral & Direct",
        "Reminder: Information Needed to Complete Recredentialing",
        concat!(
            "Dear [Attorney’s Name],\n",
            "\n",
            "This is a quick reminder as part of our recredentialing project to ensure all provider records are accurate and current.\n",
            "\n",
            "To finalize your profile, we still need the following:\n",
            "- Updated professional liability insurance documentation\n",
            "- Verified contact information\n",
            "- Any revisions to your legal focus areas or office staff assisting with clients\n",
            "\n",
            "If you’ve already submitted this, feel free to disregard. Otherwise, we’d appreciate your reply at your earliest convenience. After three outreach attempts, we may need to pause referrals until we can verify your information.",
        ),
    ),
];
