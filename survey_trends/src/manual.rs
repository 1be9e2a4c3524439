/*!

This is the long-form manual for `survey_trends` and `retrodash`.

## Inputs

Each release of the retrospective survey is exported as a spreadsheet: one row per
respondent, one column per question. The first row holds the questions.

The following formats are supported by `retrodash`:
* `xlsx` Excel workbooks (Microsoft Forms, Google Forms exports). The first worksheet is
  used unless `--excel-worksheet-name` is provided.
* `csv` Comma Separated Values with a header row.

The name of the release is taken from the configuration, or from the file name:
`Retro_August_2024.xlsx` becomes `August 2024`, and `retro_sept.csv` becomes `September`.
Releases are ordered by their name, which must be a full month name followed by the year
(`September 2024`; `Sept 2024` is placed after the other months of 2024). When the year is
missing (older exports), the release is considered to be from 2024.

Several files may belong to the same release. Their rows are added one after the other.

## Matching questions across releases

Questions get reworded from one release to the next. To follow a question over time, its
column is looked up in every release with the following rules, in order:

1. the header is exactly the question;
2. the header is the question once line breaks and surrounding spaces are removed;
3. the header is the question followed by a clarification starting with `(`, `-` or `/`,
   for example `What is your role? (select one)`;
4. enough words of the question (longer than 3 letters) appear in the header. The default
   is 30% of the words, see `--token-threshold`. A header without any word of the question
   never matches.

The first rule that finds a header wins. Rule 4 is not used for director breakdowns, and
may be disabled altogether with `--no-token-overlap`.

The summary reports for every release which rule matched (`matchedBy`), so that unexpected
matches can be spotted.

## Director breakdowns

The director of a respondent is read from the question
`You are part of which of the following directors org`. If a release does not have it,
the first column mentioning `director`, then the first column mentioning `org`, is used.

## Output

For every question, the summary contains:
* `trends`: the percentage of each answer, per release. Releases where the question was not
  found are left out.
* `responseCounts`: the number of answers per release (0 when the question was not found).
* `releases`: the status of each release: `unresolved`, `resolvedEmpty` (the question
  exists but nobody answered it) or `resolvedWithData`.

When a director is selected with `--director`, every question also gets:
* `director`: the same trends, counting only the respondents of this director;
* `directorBreakdown`: the answers of the latest release, split by director.

When headcounts are provided, `participation` gives for every director of the latest
release the number of respondents, the headcount and the participation rate.

Percentages are relative to the respondents who answered that question in that release,
and are rounded to two decimals.

## Configuration

All the settings can be given on the command line. For recurring dashboards, `--config`
reads them from a JSON file instead. The options of the command line take precedence.

```json
{
  "outputSettings": {
    "dashboardName": "platform_retro",
    "outputDirectory": "output"
  },
  "releaseSources": [
    {"provider": "xlsx", "filePath": "Retro_August_2024.xlsx", "excelWorksheetName": "Form1"},
    {"provider": "csv", "filePath": "exports/september.csv", "releaseKey": "September 2024"}
  ],
  "questions": ["What is your role?"],
  "matching": {
    "tokenOverlapThreshold": 0.3,
    "tokenOverlap": true,
    "directorColumn": "You are part of which of the following directors org"
  },
  "headcounts": [
    {"release": "August 2024", "director": "Alice", "headcount": 12}
  ]
}
```

All the sections are optional.

`outputSettings`:
- `dashboardName` (string, default `retrospective`): the summary is written to
  `<outputDirectory>/<dashboardName>_summary.json`.
- `outputDirectory` (string, optional): if missing, the summary goes to the standard output.
  `--out` overrides this location.

`releaseSources` (array), one entry per export, added to the `--input` files:
- `provider` (`xlsx` or `csv`)
- `filePath` (string): relative paths start from the directory of the configuration file.
- `releaseKey` (string, optional): the release of this file. Derived from the file name
  if missing.
- `excelWorksheetName` (string, optional): the worksheet to read in an Excel file.

`questions` (array of strings): the questions to analyze. Replaced by `--question`. If
no question is given at all, every question found in the exports is analyzed.

`matching`:
- `tokenOverlapThreshold` (number above 0 and at most 1, default 0.3): see rule 4 above.
- `tokenOverlap` (boolean, default true): set to false to disable rule 4.
- `directorColumn` (string): the question that identifies the director of a respondent.

`headcounts` (array): the number of people of each director's organization, per release.
Each entry has a `release`, a `director` and a `headcount`.

*/
